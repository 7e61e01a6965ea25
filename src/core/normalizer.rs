use crate::domain::model::{Cep, CEP_LENGTH};

/// Keeps only ASCII decimal digits, in their original order.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Outcome of reading one piece of user input as a CEP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CepInput {
    /// No digits at all: the input is ignored without a message.
    Empty,
    Valid(Cep),
    InvalidLength(String),
}

pub fn classify(raw: &str) -> CepInput {
    let digits = normalize(raw);
    if digits.is_empty() {
        return CepInput::Empty;
    }
    if digits.len() != CEP_LENGTH {
        return CepInput::InvalidLength(digits);
    }
    match Cep::from_digits(&digits) {
        Some(cep) => CepInput::Valid(cep),
        None => CepInput::InvalidLength(digits),
    }
}
