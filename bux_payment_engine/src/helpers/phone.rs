/// Tokens stripped from North American billing phone numbers before they are forwarded with a
/// payment request. Applied in this order, so "( " is removed as a unit before the remaining
/// spaces go.
const PHONE_NOISE: [&str; 5] = ["( ", "-", " ", " )", "."];

pub fn clean_phone(phone: &str) -> String {
    let mut cleaned = phone.to_string();
    for token in PHONE_NOISE {
        cleaned = cleaned.replace(token, "");
    }
    cleaned
}
