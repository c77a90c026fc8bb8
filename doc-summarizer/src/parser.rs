use crate::types::SummaryResult;

/// Split an AI response into its body and key points.
///
/// Every line whose trimmed form starts with `-` becomes a key point, with the
/// dash and surrounding whitespace removed. The body is the whole response,
/// untouched, so key points also remain visible inside it.
pub fn parse_summary(message: &str) -> SummaryResult {
    SummaryResult {
        body: message.to_string(),
        key_points: extract_key_points(message),
    }
}

pub fn extract_key_points(message: &str) -> Vec<String> {
    message
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix('-'))
        .map(|point| point.trim().to_string())
        .collect()
}
