use serde_json::json;

use flow_spec::{FlowSpec, Question, QuestionType, answers_schema, resolve_active_path, validate};

fn fixture(name: &str) -> &'static str {
    match name {
        "simple_flow" => include_str!("fixtures/simple_flow.json"),
        "branching_flow" => include_str!("fixtures/branching_flow.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

#[test]
fn simple_flow_deserializes_with_defaults() {
    let spec: FlowSpec = serde_json::from_str(fixture("simple_flow")).expect("deserialize");
    assert_eq!(spec.title, "Customer intake");
    assert!(spec.options.progressbar);
    assert!(spec.options.navigation, "navigation defaults on");
    assert_eq!(spec.questions.len(), 3);
    assert_eq!(spec.questions[2].kind, QuestionType::Rate);
    assert!(!spec.questions[2].required);
}

#[test]
fn branching_flow_resolves_paths_per_topic() {
    let spec: FlowSpec = serde_json::from_str(fixture("branching_flow")).expect("deserialize");
    let mut questions: Vec<Question> = spec
        .questions
        .iter()
        .enumerate()
        .map(|(position, question)| Question::from_spec(question, position))
        .collect();
    for (position, question) in questions.iter_mut().enumerate() {
        question.set_index(position);
    }

    // "bug" skips the invoice question; the walk then continues
    // sequentially through the jump-free tail.
    questions[0].set_answer(json!("bug"));
    questions[0].answered = true;
    let path = resolve_active_path(&mut questions);
    let ids: Vec<&str> = path
        .iter()
        .filter_map(|&position| questions[position].id())
        .collect();
    assert_eq!(ids, vec!["topic", "details", "summary", "contact"]);

    questions[0].set_answer(json!("Something else"));
    let path = resolve_active_path(&mut questions);
    let ids: Vec<&str> = path
        .iter()
        .filter_map(|&position| questions[position].id())
        .collect();
    assert_eq!(ids, vec!["topic", "summary", "contact"]);
}

#[test]
fn fixture_round_trips_through_serde() {
    let spec: FlowSpec = serde_json::from_str(fixture("branching_flow")).expect("deserialize");
    let encoded = serde_json::to_value(&spec).expect("serialize");
    let decoded: FlowSpec = serde_json::from_value(encoded).expect("re-deserialize");
    assert_eq!(decoded, spec);
}

#[test]
fn schema_covers_the_fixture_questions() {
    let spec: FlowSpec = serde_json::from_str(fixture("simple_flow")).expect("deserialize");
    let schema = answers_schema(&spec);
    let properties = schema["properties"].as_object().expect("properties");
    assert!(properties.contains_key("name"));
    assert!(properties.contains_key("mail"));
    assert_eq!(properties["rating"]["maximum"], json!(5));
    let required = schema["required"].as_array().expect("required");
    assert!(required.iter().any(|value| value == "name"));
}

#[test]
fn validation_accepts_a_complete_branch() {
    let spec: FlowSpec = serde_json::from_str(fixture("branching_flow")).expect("deserialize");
    let answers = json!({
        "topic": "billing",
        "invoice": "INV-1042",
        "contact": "user@example.com"
    });
    let result = validate(&spec, &answers);
    assert!(result.valid, "unexpected failures: {result:?}");
}

#[test]
fn validation_flags_the_wrong_branch() {
    let spec: FlowSpec = serde_json::from_str(fixture("branching_flow")).expect("deserialize");
    // "billing" jumps to the invoice question, which is left unanswered.
    let answers = json!({ "topic": "billing", "contact": "user@example.com" });
    let result = validate(&spec, &answers);
    assert!(!result.valid);
    assert_eq!(result.missing_required, vec!["invoice"]);
}
