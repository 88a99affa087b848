use predicate_search::editor::{Row, RowEditor};
use predicate_search::predicate::{evaluate, filter, to_canonical_format, to_target_expression};
use predicate_search::schema::{Literal, Operator};
use predicate_search::store::{sample_people, MemoryStore, RecordStore};
use predicate_search::{FilterSession, LogicalType, Person, Predicate, SessionState};
use serde_json::json;

async fn sample_records() -> Vec<Person> {
    let store = MemoryStore::new();
    store.insert_many(sample_people()).await.unwrap()
}

fn last_names(people: &[Person]) -> Vec<&str> {
    people.iter().map(|p| p.last_name.as_str()).collect()
}

#[tokio::test]
async fn test_editor_to_session_flow() {
    let records = sample_records().await;
    let mut session = FilterSession::new(records.clone());
    let mut editor = RowEditor::with_default_row();

    // The fresh row has no operator yet
    let outcome = editor.build();
    assert!(!outcome.is_complete());
    assert_eq!(
        session.set_predicate(outcome.into_predicate()),
        SessionState::Unfiltered
    );

    editor
        .update_row(0, Row::comparison(0, "firstName", Operator::EndsWith, json!("E")))
        .unwrap();
    editor.add_row(Row::comparison(0, "department", Operator::NotEquals, json!("IT")));

    let state = session.set_predicate(editor.build().into_predicate());
    assert_eq!(state, SessionState::Filtered);
    assert_eq!(
        session.canonical(),
        "firstName ENDSWITH[cd] \"E\" AND department != \"IT\""
    );
    assert_eq!(
        last_names(session.displayed()),
        vec!["Martin", "Bernard", "Dubois", "Rousseau", "Fontaine"]
    );

    // Loading the applied tree back gives the same tree
    let applied = session.predicate().cloned();
    let mut reloaded = RowEditor::new();
    reloaded.load(applied.as_ref());
    assert_eq!(reloaded.build().into_predicate(), applied);
}

#[tokio::test]
async fn test_filter_keeps_input_order() {
    let records = sample_records().await;
    let tree = Predicate::or(vec![
        Predicate::comparison("department", Operator::Equals, Literal::Text("HR".into()), true)
            .unwrap(),
        Predicate::comparison("country", Operator::Equals, Literal::Text("Suisse".into()), true)
            .unwrap(),
    ]);

    let kept = filter(Some(&tree), &records).unwrap();
    assert_eq!(last_names(&kept), vec!["Martin", "Moreau", "Fontaine"]);
    assert_eq!(filter(None, &records).unwrap(), records);
}

#[tokio::test]
async fn test_negation_property_over_samples() {
    let records = sample_records().await;
    let trees = vec![
        Predicate::comparison("age", Operator::LessOrEqual, Literal::Integer(26), true).unwrap(),
        Predicate::comparison("lastName", Operator::Contains, Literal::Text("ou".into()), false)
            .unwrap(),
        Predicate::and(vec![]),
        Predicate::or(vec![]),
    ];

    for tree in trees {
        let negated = Predicate::not(tree.clone());
        for record in &records {
            assert_eq!(
                evaluate(&negated, record).unwrap(),
                !evaluate(&tree, record).unwrap()
            );
        }
    }
}

#[tokio::test]
async fn test_diacritics_are_folded_when_case_insensitive() {
    let store = MemoryStore::new();
    let records = store
        .insert(predicate_search::NewPerson::new("Hélène", "Lefèvre", 41))
        .await
        .unwrap();

    let loose = Predicate::comparison("firstName", Operator::Equals, Literal::Text("helene".into()), false)
        .unwrap();
    let strict = Predicate::comparison("lastName", Operator::Equals, Literal::Text("Lefevre".into()), true)
        .unwrap();

    assert!(evaluate(&loose, &records[0]).unwrap());
    assert!(!evaluate(&strict, &records[0]).unwrap());
}

#[tokio::test]
async fn test_renderers_agree_on_structure() {
    let tree = Predicate::or(vec![
        Predicate::and(vec![
            Predicate::comparison("age", Operator::GreaterThan, Literal::Integer(18), true).unwrap(),
            Predicate::comparison("isBool", Operator::Equals, Literal::Boolean(false), true)
                .unwrap(),
        ]),
        Predicate::not(
            Predicate::comparison("country", Operator::BeginsWith, Literal::Text("B".into()), true)
                .unwrap(),
        ),
    ]);

    assert_eq!(
        to_canonical_format(Some(&tree)).unwrap(),
        "(age > 18 AND isBool == FALSE) OR NOT (country BEGINSWITH \"B\")"
    );
    assert_eq!(
        to_target_expression(Some(&tree)).unwrap(),
        "(record.age > 18 && record.isBool == false) || !(record.country.hasPrefix(\"B\"))"
    );

    let records = sample_records().await;
    let mut session = FilterSession::new(records);
    session.set_predicate(Some(tree));
    assert_eq!(
        last_names(session.displayed()),
        vec!["Dupont", "Martin", "Dubois", "Moreau", "Rousseau", "Lefevre"]
    );
}

#[test]
fn test_rows_with_explicit_groups() {
    let mut editor = RowEditor::new();
    editor.add_row(Row::group(0, LogicalType::Not));
    editor.add_row(Row::group(1, LogicalType::Or));
    editor.add_row(Row::comparison(2, "age", Operator::LessThan, json!(20)));
    editor.add_row(Row::comparison(2, "age", Operator::GreaterThan, json!(40)));

    let tree = editor.build().into_predicate().unwrap();
    assert_eq!(
        to_canonical_format(Some(&tree)).unwrap(),
        "NOT (age < 20 OR age > 40)"
    );
}
