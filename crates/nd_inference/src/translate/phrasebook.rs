use nd_core::Sentiment;

/// Fixed Hindi verdicts keyed on the dominant sentiment. Used when neither the
/// generation nor the translation provider answered.
pub fn hindi_verdict(company: &str, dominant: Option<Sentiment>) -> String {
    match dominant {
        Some(Sentiment::Positive) => format!(
            "{} की नवीनतम खबरें ज्यादातर सकारात्मक हैं। बाजार प्रदर्शन और नवाचार के कारण स्टॉक में वृद्धि की संभावना है।",
            company
        ),
        Some(Sentiment::Negative) => format!(
            "{} की नवीनतम खबरें ज्यादातर नकारात्मक हैं। नियामक या बाजार चुनौतियों के कारण सावधानी बरतें।",
            company
        ),
        _ => format!(
            "{} की नवीनतम खबरें संतुलित हैं। मिश्रित अवसरों और चुनौतियों के साथ स्थिर प्रदर्शन की उम्मीद है।",
            company
        ),
    }
}

pub fn hindi_no_news(company: &str) -> String {
    format!("{} के बारे में कोई पढ़ने योग्य समाचार लेख नहीं मिला।", company)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdicts() {
        assert!(hindi_verdict("Tesla", Some(Sentiment::Positive)).contains("सकारात्मक"));
        assert!(hindi_verdict("Tesla", Some(Sentiment::Negative)).contains("नकारात्मक"));
        assert!(hindi_verdict("Tesla", Some(Sentiment::Neutral)).contains("संतुलित"));
        assert!(hindi_verdict("Tesla", None).starts_with("Tesla"));
    }

    #[test]
    fn test_no_news() {
        assert!(hindi_no_news("Acme").starts_with("Acme"));
    }
}
