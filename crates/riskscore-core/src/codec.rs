//! Likert label to intensity encoding.

use crate::model::{AnswerLabel, Intensity};

/// Encode an answer label on the 0..=3 intensity scale.
///
/// Total over its input: anything outside the four known labels scores zero.
pub fn encode(label: &AnswerLabel) -> Intensity {
    match label {
        AnswerLabel::Nunca => Intensity::new(0),
        AnswerLabel::RaraVez => Intensity::new(1),
        AnswerLabel::AVeces => Intensity::new(2),
        AnswerLabel::Frecuentemente => Intensity::new(3),
        AnswerLabel::Unrecognized(_) => Intensity::ZERO,
    }
}

/// Encode raw label text, as found in imported rows.
pub fn encode_str(raw: &str) -> Intensity {
    encode(&AnswerLabel::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map_to_ordinal_scale() {
        assert_eq!(encode_str("Nunca").value(), 0);
        assert_eq!(encode_str("Rara vez").value(), 1);
        assert_eq!(encode_str("A veces").value(), 2);
        assert_eq!(encode_str("Frecuentemente").value(), 3);
    }

    #[test]
    fn unknown_labels_default_to_zero() {
        for raw in ["", "siempre", "FRECUENTEMENTE", "3", "rara  vez"] {
            assert_eq!(encode_str(raw), Intensity::ZERO, "label {raw:?}");
        }
        assert_eq!(encode(&AnswerLabel::default()), Intensity::ZERO);
    }

    #[test]
    fn encode_is_bounded() {
        for raw in ["Nunca", "Rara vez", "A veces", "Frecuentemente", "x"] {
            assert!(encode_str(raw) <= Intensity::MAX);
        }
    }
}
