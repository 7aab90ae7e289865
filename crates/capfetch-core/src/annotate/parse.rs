//! Interpreting model output.

use super::inference::InferenceError;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn text_word_re() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"\b(sign|poster|collage)\b").expect("invalid regex"))
}

/// Captioner output: `[{"generated_text": "..."}]`.
pub fn caption_from_json(value: &Value) -> Result<String, InferenceError> {
    value
        .as_array()
        .and_then(|items| items.first())
        .and_then(|first| first.get("generated_text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| InferenceError::Shape {
            expected: r#"[{"generated_text": string}]"#,
            got: value.to_string(),
        })
}

/// Document-QA output: `{"question": "...", "answer": "..."}`.
pub fn answer_from_json(value: &Value) -> Result<String, InferenceError> {
    value
        .get("answer")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| InferenceError::Shape {
            expected: r#"{"answer": string}"#,
            got: value.to_string(),
        })
}

/// Concatenates every string leaf of `value` in document order, without
/// separators. Numbers, booleans and nulls are ignored.
pub fn flatten_text(value: &Value) -> String {
    fn walk(value: &Value, out: &mut String) {
        match value {
            Value::String(s) => out.push_str(s),
            Value::Array(items) => items.iter().for_each(|v| walk(v, out)),
            Value::Object(map) => map.values().for_each(|v| walk(v, out)),
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    let mut out = String::new();
    walk(value, &mut out);
    out
}

/// Heuristic on the caption: is the image probably text (a logo, banner...)
/// worth sending through OCR?
pub fn is_likely_text_based(caption: &str) -> bool {
    // Almost always icons.
    if caption.contains("black and white") || caption.contains("white and black") {
        return false;
    }
    if text_word_re().is_match(caption) {
        return true;
    }
    // Usually a large gradient background, sometimes with text on it.
    caption.contains("a blurry image")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn caption_shape() {
        assert_eq!(
            caption_from_json(&json!([{"generated_text": "a red sign"}])).unwrap(),
            "a red sign"
        );
        assert!(caption_from_json(&json!([])).is_err());
        assert!(caption_from_json(&json!({"generated_text": "x"})).is_err());
        assert!(caption_from_json(&json!([{"generated_text": 3}])).is_err());
    }

    #[test]
    fn answer_shape() {
        assert_eq!(
            answer_from_json(&json!({"question": "q", "answer": "ACME"})).unwrap(),
            "ACME"
        );
        assert!(answer_from_json(&json!({"question": "q"})).is_err());
    }

    #[test]
    fn flatten_keeps_document_order() {
        let v = json!({
            "menu": [{"nm": "COFFEE", "price": "3.00"}, {"nm": "TEA", "cnt": 2}],
            "total": {"total_price": "5.50"},
            "flag": true
        });
        assert_eq!(flatten_text(&v), "COFFEE3.00TEA5.50");
        assert_eq!(flatten_text(&json!(["Hello", " ", "world"])), "Hello world");
        assert_eq!(flatten_text(&json!(null)), "");
    }

    #[test]
    fn text_based_heuristic() {
        assert!(is_likely_text_based("a red and white sign on a pole"));
        assert!(is_likely_text_based("a poster of a band"));
        assert!(is_likely_text_based("a collage of photos"));
        assert!(is_likely_text_based("a blurry image of a room"));
        assert!(!is_likely_text_based("a black and white sign"));
        assert!(!is_likely_text_based("a white and black poster"));
        assert!(!is_likely_text_based("a person signing a paper"));
        assert!(!is_likely_text_based("a dog in a field"));
        assert!(!is_likely_text_based(""));
    }
}
