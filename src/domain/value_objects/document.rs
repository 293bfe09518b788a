//! Check-digit validation for Brazilian CPF (individual) and CNPJ (company)
//! identifiers.
//!
//! Both validators strip every non-digit before checking, so masked input
//! such as `529.982.247-25` is accepted. Malformed input is never an error:
//! the answer is simply `false`.

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

const CPF_LEN: usize = 11;
const CNPJ_LEN: usize = 14;

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

pub fn validate_cpf(input: &str) -> bool {
    let Some(digits) = digits_of_len(input, CPF_LEN) else {
        return false;
    };

    let first = check_digit(&digits[..9], &descending_weights(10));
    let second = check_digit(&digits[..10], &descending_weights(11));

    digits[9] == first && digits[10] == second
}

pub fn validate_cnpj(input: &str) -> bool {
    let Some(digits) = digits_of_len(input, CNPJ_LEN) else {
        return false;
    };

    let first = check_digit(&digits[..12], &CNPJ_FIRST_WEIGHTS);
    let second = check_digit(&digits[..13], &CNPJ_SECOND_WEIGHTS);

    digits[12] == first && digits[13] == second
}

/// Strips non-digits and keeps the result only when it has the expected
/// length and is not one repeated digit.
fn digits_of_len(input: &str, len: usize) -> Option<Vec<u32>> {
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != len {
        return None;
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return None;
    }
    Some(digits)
}

fn descending_weights(from: u32) -> Vec<u32> {
    (2..=from).rev().collect()
}

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Cpf,
    Cnpj,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Cpf => "cpf",
            DocumentKind::Cnpj => "cnpj",
        }
    }
}

/// A CPF or CNPJ whose check digits have been verified. Holds only the
/// digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DocumentRecord")]
pub struct Document {
    kind: DocumentKind,
    digits: String,
}

/// Wire shape of [`Document`]; only reaches the domain through `parse`.
#[derive(Deserialize)]
struct DocumentRecord {
    kind: DocumentKind,
    digits: String,
}

impl TryFrom<DocumentRecord> for Document {
    type Error = DomainError;

    fn try_from(record: DocumentRecord) -> Result<Self, Self::Error> {
        match Document::parse(&record.digits) {
            Some(document) if document.kind == record.kind && document.digits == record.digits => {
                Ok(document)
            }
            _ => Err(DomainError::Validation(format!(
                "{:?} is not a valid {}",
                record.digits,
                record.kind.as_str()
            ))),
        }
    }
}

impl Document {
    /// Picks the document kind from the stripped length, then validates.
    pub fn parse(input: &str) -> Option<Self> {
        let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
        let kind = match digits.len() {
            CPF_LEN if validate_cpf(&digits) => DocumentKind::Cpf,
            CNPJ_LEN if validate_cnpj(&digits) => DocumentKind::Cnpj,
            _ => return None,
        };
        Some(Self { kind, digits })
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// `000.000.000-00` for CPF, `00.000.000/0000-00` for CNPJ.
    pub fn formatted(&self) -> String {
        let d = &self.digits;
        match self.kind {
            DocumentKind::Cpf => format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]),
            DocumentKind::Cnpj => format!(
                "{}.{}.{}/{}-{}",
                &d[..2],
                &d[2..5],
                &d[5..8],
                &d[8..12],
                &d[12..]
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Straightforward modulo-11 computation used to cross-check the
    /// validators on generated input.
    fn reference_check_digits(base: &[u32], first_weights: &[u32], second_weights: &[u32]) -> (u32, u32) {
        let reduce = |sum: u32| if sum % 11 < 2 { 0 } else { 11 - sum % 11 };
        let mut sum = 0;
        for i in 0..base.len() {
            sum += base[i] * first_weights[i];
        }
        let first = reduce(sum);
        let mut extended = base.to_vec();
        extended.push(first);
        let mut sum = 0;
        for i in 0..extended.len() {
            sum += extended[i] * second_weights[i];
        }
        (first, reduce(sum))
    }

    fn render(digits: &[u32]) -> String {
        digits.iter().map(|d| char::from_digit(*d, 10).unwrap()).collect()
    }

    #[test]
    fn known_valid_cpfs() {
        assert!(validate_cpf("11144477735"));
        assert!(validate_cpf("52998224725"));
        assert!(validate_cpf("529.982.247-25"));
        assert!(validate_cpf("19100000000"));
    }

    #[test]
    fn known_invalid_cpfs() {
        assert!(!validate_cpf("123.456.789-00"));
        assert!(!validate_cpf("52998224724"));
        assert!(!validate_cpf("11144477734"));
    }

    #[test]
    fn known_valid_cnpjs() {
        assert!(validate_cnpj("11444777000161"));
        assert!(validate_cnpj("00000000000191"));
        assert!(validate_cnpj("11.444.777/0001-61"));
    }

    #[test]
    fn known_invalid_cnpjs() {
        assert!(!validate_cnpj("11444777000162"));
        assert!(!validate_cnpj("11444777000151"));
    }

    #[test]
    fn repeated_digits_are_rejected() {
        for d in 0..10 {
            let cpf = d.to_string().repeat(CPF_LEN);
            let cnpj = d.to_string().repeat(CNPJ_LEN);
            assert!(!validate_cpf(&cpf), "{cpf}");
            assert!(!validate_cnpj(&cnpj), "{cnpj}");
        }
    }

    #[test]
    fn blank_and_wrong_length_are_rejected() {
        for input in ["", "   ", "abc", "1114447773", "111444777355", "--.--"] {
            assert!(!validate_cpf(input), "{input:?}");
            assert!(!validate_cnpj(input), "{input:?}");
        }
        assert!(!validate_cpf("11444777000161"));
        assert!(!validate_cnpj("11144477735"));
    }

    #[test]
    fn non_ascii_digits_are_ignored() {
        assert!(!validate_cpf("١١١٤٤٤٧٧٧٣٥"));
    }

    #[test]
    fn cpf_matches_reference_on_generated_input() {
        let first: Vec<u32> = (2..=10).rev().collect();
        let second: Vec<u32> = (2..=11).rev().collect();
        let mut rng = fastrand::Rng::with_seed(0x0c9f);
        for _ in 0..2_000 {
            let base: Vec<u32> = (0..9).map(|_| rng.u32(0..10)).collect();
            let (d1, d2) = reference_check_digits(&base, &first, &second);
            let mut valid = base.clone();
            valid.extend([d1, d2]);
            let repeated = valid.iter().all(|d| *d == valid[0]);
            assert_eq!(validate_cpf(&render(&valid)), !repeated);

            let mut wrong = valid.clone();
            wrong[10] = (d2 + 1 + rng.u32(0..9)) % 10;
            assert!(!validate_cpf(&render(&wrong)));
        }
    }

    #[test]
    fn cnpj_matches_reference_on_generated_input() {
        let mut rng = fastrand::Rng::with_seed(0x14);
        for _ in 0..2_000 {
            let base: Vec<u32> = (0..12).map(|_| rng.u32(0..10)).collect();
            let (d1, d2) =
                reference_check_digits(&base, &CNPJ_FIRST_WEIGHTS, &CNPJ_SECOND_WEIGHTS);
            let mut valid = base.clone();
            valid.extend([d1, d2]);
            let repeated = valid.iter().all(|d| *d == valid[0]);
            assert_eq!(validate_cnpj(&render(&valid)), !repeated);

            let mut wrong = valid.clone();
            wrong[12] = (d1 + 1 + rng.u32(0..9)) % 10;
            assert!(!validate_cnpj(&render(&wrong)));
        }
    }

    #[test]
    fn parse_detects_kind_and_formats() {
        let cpf = Document::parse("52998224725").unwrap();
        assert_eq!(cpf.kind(), DocumentKind::Cpf);
        assert_eq!(cpf.formatted(), "529.982.247-25");

        let cnpj = Document::parse("11.444.777/0001-61").unwrap();
        assert_eq!(cnpj.kind(), DocumentKind::Cnpj);
        assert_eq!(cnpj.digits(), "11444777000161");
        assert_eq!(cnpj.formatted(), "11.444.777/0001-61");

        assert!(Document::parse("123.456.789-00").is_none());
        assert!(Document::parse("").is_none());
    }

    #[test]
    fn deserializing_revalidates_check_digits() {
        let cpf: Document =
            serde_json::from_str(r#"{"kind":"cpf","digits":"52998224725"}"#).unwrap();
        assert_eq!(cpf.formatted(), "529.982.247-25");
        assert_eq!(
            serde_json::to_value(&cpf).unwrap(),
            serde_json::json!({"kind": "cpf", "digits": "52998224725"})
        );

        for bad in [
            r#"{"kind":"cpf","digits":"12"}"#,
            r#"{"kind":"cpf","digits":"52998224724"}"#,
            r#"{"kind":"cnpj","digits":"52998224725"}"#,
            r#"{"kind":"cpf","digits":"529.982.247-25"}"#,
            r#"{"kind":"cnpj","digits":"1144477700016"}"#,
        ] {
            let err = serde_json::from_str::<Document>(bad).unwrap_err();
            assert!(err.to_string().contains("Validation failed"), "{bad}: {err}");
        }
    }
}
