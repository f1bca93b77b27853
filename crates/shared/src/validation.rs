//! Common validation utilities.

use validator::ValidationError;

/// Smallest number of hizb a participant can take.
pub const MIN_HIZB_PORTION: i32 = 1;

/// Largest number of hizb a participant can take.
pub const MAX_HIZB_PORTION: i32 = 2;

/// Validates that a requested portion is 1 or 2 hizb.
pub fn validate_hizb_portion(size: i32) -> Result<(), ValidationError> {
    if (MIN_HIZB_PORTION..=MAX_HIZB_PORTION).contains(&size) {
        Ok(())
    } else {
        let mut err = ValidationError::new("hizb_portion");
        err.message = Some("Part invalide (choisir 1 ou 2).".into());
        Err(err)
    }
}

/// Validates that a hizb number is positive.
pub fn validate_hizb_number(hizb: i32) -> Result<(), ValidationError> {
    if hizb >= 1 {
        Ok(())
    } else {
        let mut err = ValidationError::new("hizb_number");
        err.message = Some("Plage de hizb invalide.".into());
        Err(err)
    }
}

/// Validates that a string is not made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Ce champ ne peut pas être vide.".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates a name initial: one to three letters, optionally followed by a dot.
pub fn validate_name_initial(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    let letters = trimmed.strip_suffix('.').unwrap_or(trimmed);
    let count = letters.chars().count();
    if (1..=3).contains(&count) && letters.chars().all(char::is_alphabetic) {
        Ok(())
    } else {
        let mut err = ValidationError::new("name_initial");
        err.message = Some("Initiale invalide.".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::name::en::LastName;
    use fake::Fake;

    #[test]
    fn test_validate_hizb_portion() {
        assert!(validate_hizb_portion(1).is_ok());
        assert!(validate_hizb_portion(2).is_ok());
        assert!(validate_hizb_portion(0).is_err());
        assert!(validate_hizb_portion(3).is_err());
        assert!(validate_hizb_portion(-1).is_err());
    }

    #[test]
    fn test_validate_hizb_portion_error_message() {
        let err = validate_hizb_portion(5).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Part invalide (choisir 1 ou 2)."
        );
    }

    #[test]
    fn test_validate_hizb_number() {
        assert!(validate_hizb_number(1).is_ok());
        assert!(validate_hizb_number(60).is_ok());
        assert!(validate_hizb_number(0).is_err());
        assert!(validate_hizb_number(-3).is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Khatma du vendredi").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \t").is_err());
    }

    #[test]
    fn test_validate_name_initial() {
        assert!(validate_name_initial("B").is_ok());
        assert!(validate_name_initial("B.").is_ok());
        assert!(validate_name_initial("é").is_ok());
        assert!(validate_name_initial("AB").is_ok());
        assert!(validate_name_initial("").is_err());
        assert!(validate_name_initial(".").is_err());
        assert!(validate_name_initial("B4").is_err());
        assert!(validate_name_initial("ABCD").is_err());
    }

    #[test]
    fn test_validate_name_initial_single_trailing_dot() {
        assert!(validate_name_initial("ABC.").is_ok());
        assert!(validate_name_initial(" ABC. ").is_ok());
        assert!(validate_name_initial("ABC..").is_err());
        assert!(validate_name_initial("B..").is_err());
        assert!(validate_name_initial("..").is_err());
    }

    #[test]
    fn test_validate_name_initial_from_fake_names() {
        for _ in 0..20 {
            let last_name: String = LastName().fake();
            let initial: String = last_name.chars().take(1).collect();
            assert!(validate_name_initial(&initial).is_ok(), "{}", initial);
        }
    }
}
