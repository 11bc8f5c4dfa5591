use serde_json::{Map, Value, json};

use crate::spec::{ChoiceSpec, FlowSpec, QuestionSpec, QuestionType};

/// Build a JSON schema describing a valid answer set for the flow.
///
/// Ids follow the same derivation the engine applies (`q_<index>` for
/// questions declared without one). Section breaks collect no answer and
/// are omitted.
pub fn generate(spec: &FlowSpec) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for (position, question) in spec.questions.iter().enumerate() {
        if question.kind.is_informational() {
            continue;
        }
        let id = question
            .id
            .clone()
            .unwrap_or_else(|| format!("q_{position}"));
        properties.insert(id.clone(), question_schema(question));
        if question.required {
            required.push(Value::String(id));
        }
    }

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn question_schema(question: &QuestionSpec) -> Value {
    let mut schema = base_schema(question);
    if let Some(map) = schema.as_object_mut() {
        if let Some(description) = &question.description {
            map.insert("description".into(), Value::String(description.clone()));
        } else {
            map.insert("description".into(), Value::String(question.title.clone()));
        }
    }
    if question.multiple {
        return json!({
            "type": "array",
            "items": schema,
        });
    }
    schema
}

fn base_schema(question: &QuestionSpec) -> Value {
    match question.kind {
        QuestionType::Number => json!({ "type": "number" }),
        QuestionType::Rate => json!({
            "type": "integer",
            "minimum": 1,
            "maximum": question.max_rating.unwrap_or(10),
        }),
        QuestionType::Email => json!({ "type": "string", "format": "email" }),
        QuestionType::Url => json!({ "type": "string", "format": "uri" }),
        QuestionType::Date => json!({ "type": "string", "format": "date" }),
        QuestionType::Dropdown
        | QuestionType::MultipleChoice
        | QuestionType::MultiplePictureChoice => {
            // The enum constraint only holds when free-text entries are
            // disallowed and at least one option is declared.
            let values: Vec<Value> = question.options.iter().map(effective_value).collect();
            if question.allow_other || values.is_empty() {
                json!({ "type": "string" })
            } else {
                json!({ "enum": values })
            }
        }
        _ => {
            let mut schema = json!({ "type": "string" });
            if let Some(max) = question.max_length
                && let Some(map) = schema.as_object_mut()
            {
                map.insert("maxLength".into(), json!(max));
            }
            schema
        }
    }
}

fn effective_value(choice: &ChoiceSpec) -> Value {
    if !choice.value.is_null() {
        return choice.value.clone();
    }
    if let Some(label) = &choice.label {
        return Value::String(label.clone());
    }
    if let Some(alt) = &choice.image_alt {
        return Value::String(alt.clone());
    }
    if let Some(src) = &choice.image_src {
        return Value::String(src.clone());
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_lists_properties_and_required_ids() {
        let spec: FlowSpec = serde_json::from_value(json!({
            "title": "Survey",
            "questions": [
                { "id": "name", "type": "text", "title": "Name", "required": true },
                { "type": "number", "title": "Age" },
                { "type": "section_break", "title": "Part two" }
            ]
        }))
        .expect("flow spec");

        let schema = generate(&spec);
        let properties = schema["properties"].as_object().expect("properties");
        assert!(properties.contains_key("name"));
        assert!(properties.contains_key("q_1"));
        assert!(!properties.contains_key("q_2"), "section breaks collect nothing");
        assert_eq!(schema["required"], json!(["name"]));
    }

    #[test]
    fn choice_questions_become_enums_and_multi_select_becomes_arrays() {
        let spec: FlowSpec = serde_json::from_value(json!({
            "title": "Survey",
            "questions": [
                {
                    "id": "color", "type": "multiple_choice", "title": "Color",
                    "multiple": true,
                    "options": [ { "label": "Red", "value": "red" }, { "label": "Blue" } ]
                }
            ]
        }))
        .expect("flow spec");

        let schema = generate(&spec);
        let color = &schema["properties"]["color"];
        assert_eq!(color["type"], "array");
        assert_eq!(color["items"]["enum"], json!(["red", "Blue"]));
    }
}
