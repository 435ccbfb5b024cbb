//! Free-form tags of courses and dynamics. Tags are stored trimmed and
//! lower-cased, without blanks or repeats.
use sea_orm::Value;

pub fn normalize(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags.iter().map(|tag| tag.trim().to_lowercase()) {
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

// Normalizes a `tags` entry of an update map. Anything other than an array of
// strings is passed through.
pub(crate) fn normalize_value(value: Value) -> Value {
    match value {
        Value::Array(_, Some(values)) => {
            let tags: Vec<String> = values
                .into_iter()
                .filter_map(|value| match value {
                    Value::String(Some(tag)) => Some(*tag),
                    _ => None,
                })
                .collect();
            Value::from(normalize(&tags))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_trimmed_lowercased_and_deduplicated() {
        let tags = vec![
            " Remoto".to_owned(),
            "".to_owned(),
            "remoto".to_owned(),
            "Foco ".to_owned(),
        ];
        assert_eq!(normalize(&tags), vec!["remoto", "foco"]);
    }

    #[test]
    fn update_values_are_normalized() {
        let value = Value::from(vec![" Gestão ".to_owned(), "GESTÃO".to_owned()]);
        assert_eq!(
            normalize_value(value),
            Value::from(vec!["gestão".to_owned()])
        );
    }
}
