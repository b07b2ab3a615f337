use regex::Regex;

pub fn valid_email(email: &str) -> bool {
    if email.len() < 5 || email.len() > 100 {
        return false;
    }

    let re = Regex::new(r"^([a-z0-9_+]([a-z0-9_+.]*[a-z0-9_+])?)@([a-z0-9]+([\-\.][a-z0-9]+)*\.[a-z]{2,6})$").unwrap();
    re.is_match(&email.to_lowercase())
}

/// E.164: a plus sign, a non-zero leading digit, 8 to 15 digits total.
pub fn valid_phone(phone: &str) -> bool {
    let re = Regex::new(r"^\+[1-9][0-9]{7,14}$").unwrap();
    re.is_match(phone)
}
