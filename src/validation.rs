// Input checks performed by callers before they reach the stores
// The stores themselves accept whatever they are given

use crate::booking::PriceRange;
use crate::payment::PaymentDetails;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Check-out {check_out} must be after check-in {check_in}")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Invalid guest count: {0}")]
    InvalidGuestCount(u32),

    #[error("Invalid price range: {min} > {max}")]
    InvalidPriceRange { min: f64, max: f64 },

    #[error("Invalid card details: {0}")]
    InvalidCard(&'static str),
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

// Same shape the sign-in form accepts: `local@domain.tld` without whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    match domain.rsplit_once('.') {
        Some((host, tld)) => !local.is_empty() && !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    require(email, "email")?;
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    require(email, "email")?;
    require(password, "password")?;
    validate_email(email)
}

pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    phone: Option<&str>,
) -> Result<(), ValidationError> {
    require(name, "name")?;
    validate_login(email, password)?;
    if let Some(phone) = phone {
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        let allowed = phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
        if digits == 0 || !allowed {
            return Err(ValidationError::InvalidPhone(phone.to_string()));
        }
    }
    Ok(())
}

pub fn validate_stay(
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: u32,
) -> Result<(), ValidationError> {
    if check_out <= check_in {
        return Err(ValidationError::InvalidDateRange {
            check_in,
            check_out,
        });
    }
    if guests == 0 {
        return Err(ValidationError::InvalidGuestCount(guests));
    }
    Ok(())
}

pub fn validate_price_range(range: &PriceRange) -> Result<(), ValidationError> {
    if !range.is_ordered() {
        return Err(ValidationError::InvalidPriceRange {
            min: range.min(),
            max: range.max(),
        });
    }
    Ok(())
}

/// Checks the card form: every field filled, card number of 13 to 19
/// digits (spaces allowed), expiry as `MM/YY` and a 3 or 4 digit CVV.
pub fn validate_payment(details: &PaymentDetails) -> Result<(), ValidationError> {
    require(&details.card_number, "card number")?;
    require(&details.card_name, "cardholder name")?;
    require(&details.expiry, "expiry")?;
    require(&details.cvv, "cvv")?;

    let digits: String = details
        .card_number
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if !(13..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidCard("card number"));
    }

    let valid_expiry = match details.expiry.split_once('/') {
        Some((month, year)) => {
            month.len() == 2
                && year.len() == 2
                && year.chars().all(|c| c.is_ascii_digit())
                && month.chars().all(|c| c.is_ascii_digit())
                && month
                    .parse::<u8>()
                    .map_or(false, |month| (1..=12).contains(&month))
        }
        None => false,
    };
    if !valid_expiry {
        return Err(ValidationError::InvalidCard("expiry"));
    }

    let cvv = details.cvv.trim();
    if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidCard("cvv"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn card(number: &str, name: &str, expiry: &str, cvv: &str) -> PaymentDetails {
        PaymentDetails {
            card_number: number.to_string(),
            card_name: name.to_string(),
            expiry: expiry.to_string(),
            cvv: cvv.to_string(),
        }
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test_case("a@b.com", true; "#1 minimal address")]
    #[test_case("first.last@hotel.com.np", true; "#2 dotted domain")]
    #[test_case("no-at-sign.com", false; "#3 missing at")]
    #[test_case("a@b", false; "#4 missing tld")]
    #[test_case("a @b.com", false; "#5 whitespace")]
    #[test_case("a@b@c.com", false; "#6 two at signs")]
    #[test_case("@b.com", false; "#7 empty local part")]
    #[test_case("a@.com", false; "#8 empty host")]
    fn test_email_shape(email: &str, expected: bool) {
        assert_eq!(is_valid_email(email), expected);
    }

    #[test]
    fn test_login_requires_both_fields() {
        assert_eq!(
            validate_login("", "secret"),
            Err(ValidationError::MissingField("email"))
        );
        assert_eq!(
            validate_login("a@b.com", "  "),
            Err(ValidationError::MissingField("password"))
        );
        assert!(matches!(
            validate_login("nope", "secret"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(validate_login("a@b.com", "secret").is_ok());
    }

    #[test]
    fn test_registration_checks_name_and_phone() {
        assert_eq!(
            validate_registration("", "a@b.com", "x", None),
            Err(ValidationError::MissingField("name"))
        );
        assert!(validate_registration("Sita", "a@b.com", "x", Some("+977 980-000")).is_ok());
        assert_eq!(
            validate_registration("Sita", "a@b.com", "x", Some("call me")),
            Err(ValidationError::InvalidPhone("call me".to_string()))
        );
    }

    #[test_case("2024-06-01", "2024-06-03", 2, true; "#1 valid stay")]
    #[test_case("2024-06-03", "2024-06-03", 2, false; "#2 same day")]
    #[test_case("2024-06-05", "2024-06-03", 2, false; "#3 reversed")]
    #[test_case("2024-06-01", "2024-06-03", 0, false; "#4 no guests")]
    fn test_stay(check_in: &str, check_out: &str, guests: u32, ok: bool) {
        assert_eq!(
            validate_stay(date(check_in), date(check_out), guests).is_ok(),
            ok
        );
    }

    #[test]
    fn test_price_range_order() {
        assert!(validate_price_range(&PriceRange(0.0, 20000.0)).is_ok());
        assert!(validate_price_range(&PriceRange(500.0, 500.0)).is_ok());
        assert_eq!(
            validate_price_range(&PriceRange(900.0, 100.0)),
            Err(ValidationError::InvalidPriceRange {
                min: 900.0,
                max: 100.0
            })
        );
    }

    #[test_case(card("4242 4242 4242 4242", "Ram Thapa", "12/27", "123"), None; "#1 valid card")]
    #[test_case(card("", "Ram Thapa", "12/27", "123"), Some(ValidationError::MissingField("card number")); "#2 missing number")]
    #[test_case(card("4242 4242 4242 4242", "", "12/27", "123"), Some(ValidationError::MissingField("cardholder name")); "#3 missing name")]
    #[test_case(card("4242 4242", "Ram Thapa", "12/27", "123"), Some(ValidationError::InvalidCard("card number")); "#4 short number")]
    #[test_case(card("4242 4242 4242 424x", "Ram Thapa", "12/27", "123"), Some(ValidationError::InvalidCard("card number")); "#5 non digit")]
    #[test_case(card("4242 4242 4242 4242", "Ram Thapa", "13/27", "123"), Some(ValidationError::InvalidCard("expiry")); "#6 bad month")]
    #[test_case(card("4242 4242 4242 4242", "Ram Thapa", "1227", "123"), Some(ValidationError::InvalidCard("expiry")); "#7 no slash")]
    #[test_case(card("4242 4242 4242 4242", "Ram Thapa", "12/27", "12"), Some(ValidationError::InvalidCard("cvv")); "#8 short cvv")]
    #[test_case(card("4242 4242 4242 4242", "Ram Thapa", "+1/27", "123"), Some(ValidationError::InvalidCard("expiry")); "#9 signed month")]
    fn test_payment_details(details: PaymentDetails, expected: Option<ValidationError>) {
        assert_eq!(validate_payment(&details).err(), expected);
    }
}
