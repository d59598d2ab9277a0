//! Tests for the engine facade

use super::*;

fn base_engine() -> Engine {
    Engine::with_name(&["x1", "x2", "x3"], "Test Engine").unwrap()
}

#[test]
fn test_initialization() {
    let engine = base_engine();
    assert_eq!(engine.name(), Some("Test Engine"));
    let names: Vec<&str> = engine.variables().iter().map(|v| v.as_ref()).collect();
    assert_eq!(names, vec!["x1", "x2", "x3"]);
    assert!(engine.uncompiled_rules().is_empty());
    assert!(engine.state_vectors().is_empty());
    assert!(!engine.is_compiled());
    assert!(engine.valid_set().is_none());
}

#[test]
fn test_initialization_minimal() {
    let engine = Engine::new(&["a", "b", "c", "_start", "var_1"]).unwrap();
    let names: Vec<&str> = engine.variables().iter().map(|v| v.as_ref()).collect();
    // Sorted, with indices assigned in order.
    assert_eq!(names, vec!["_start", "a", "b", "c", "var_1"]);
    assert_eq!(engine.name(), None);
}

#[test]
fn test_initialization_full() {
    let engine = Engine::with_rules(
        &["x", "y", "z_val"],
        Some("MyTestEngine"),
        &["x => y", "y && z_val"],
    )
    .unwrap();
    assert_eq!(engine.name(), Some("MyTestEngine"));
    assert_eq!(engine.uncompiled_rules().len(), 2);
    assert_eq!(engine.state_vectors().len(), 2);
}

#[test]
fn test_duplicate_variables_are_merged() {
    let engine = Engine::new(&["b", "c", "a", "c", "b"]).unwrap();
    let names: Vec<&str> = engine.variables().iter().map(|v| v.as_ref()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);

    let engine = Engine::new(&["x3", "x1", "x2", "x1"]).unwrap();
    let names: Vec<&str> = engine.variables().iter().map(|v| v.as_ref()).collect();
    assert_eq!(names, vec!["x1", "x2", "x3"]);
}

#[test]
fn test_non_conformal_variable_names() {
    for bad in ["1b", "b-c", "b$c", "", "1x", "ünïcode"] {
        let err = Engine::new(&["a", bad]).unwrap_err();
        assert_eq!(
            err,
            EngineError::NonConformalName {
                name: Arc::from(bad)
            },
            "name {:?}",
            bad
        );
    }
}

#[test]
fn test_initialization_with_rules_converts_them() {
    let engine = Engine::with_rules(&["x1", "x2"], None, &["x1 => x2"]).unwrap();
    assert_eq!(engine.uncompiled_rules(), vec!["x1 => x2"]);
    let expected = StateVector::new(vec![Cube::new(&[], &[1]), Cube::new(&[1, 2], &[])]);
    assert_eq!(engine.state_vectors()[0], expected);
}

#[test]
fn test_add_rule() {
    let mut engine = base_engine();
    engine.add_rule("x1 || x2").unwrap();
    assert_eq!(engine.uncompiled_rules(), vec!["x1 || x2"]);
    let expected = StateVector::new(vec![Cube::new(&[1], &[]), Cube::new(&[2], &[1])]);
    assert_eq!(engine.state_vectors()[0], expected);
    assert!(!engine.is_compiled());
}

#[test]
fn test_add_rule_complex() {
    let mut engine = base_engine();
    engine.add_rule("(x1 && x2) => x3").unwrap();
    let expected = StateVector::new(vec![
        Cube::new(&[1, 2, 3], &[]),
        Cube::new(&[], &[1]),
        Cube::new(&[1], &[2]),
    ]);
    assert_eq!(engine.state_vectors()[0], expected);
}

#[test]
fn test_add_rule_rejects_bad_input() {
    let mut engine = base_engine();
    assert!(engine.add_rule("x1 && (x2").is_err());
    assert!(engine.add_rule("x1 && y1").is_err());
    assert!(engine.state_vectors().is_empty());
}

#[test]
fn test_add_evidence() {
    let mut engine = base_engine();
    engine.add_evidence(&[("x1", true), ("x3", false)]).unwrap();

    assert_eq!(
        engine.uncompiled_rules(),
        vec!["evidence: {x1: true, x3: false}"]
    );
    let expected = StateVector::new(vec![Cube::new(&[1], &[3])]);
    assert_eq!(engine.state_vectors()[0], expected);
}

#[test]
fn test_add_evidence_unknown_variable() {
    let mut engine = base_engine();
    let err = engine.add_evidence(&[("nope", true)]).unwrap_err();
    assert_eq!(
        err,
        EngineError::UnknownVariable {
            name: Arc::from("nope")
        }
    );
}

#[test]
fn test_add_state_vector() {
    let mut engine = base_engine();
    let sv = StateVector::new(vec![Cube::new(&[1], &[3])]);
    engine.add_state_vector(sv.clone());

    assert_eq!(engine.uncompiled_rules(), vec!["custom state vector"]);
    assert_eq!(engine.state_vectors()[0], sv);
}

#[test]
fn test_display() {
    let mut engine = base_engine();
    engine.add_rule("x1 => x2").unwrap();
    engine.add_evidence(&[("x3", true)]).unwrap();

    let output = engine.to_string();
    assert!(output.contains("====== Engine: Test Engine ======"));
    assert!(output.contains("Variables: [\"x1\", \"x2\", \"x3\"]"));
    assert!(output.contains("1. Rule:  x1 => x2"));
    assert!(output.contains("2. Rule:  evidence: {x3: true}"));
    assert!(output.contains("    1 1 -\n    0 - -"));
    assert!(output.contains("    - - 1"));
}

#[test]
fn test_compile_ignores_trivial_vectors() {
    let mut baseline = base_engine();
    baseline.add_rule("x1 => x2").unwrap();
    baseline.add_rule("x2 => x3").unwrap();
    baseline.compile();

    let mut engine = base_engine();
    engine.add_rule("x1 => x2").unwrap();
    engine.add_rule("x2 => x3").unwrap();
    engine.add_state_vector(StateVector::trivial());
    engine.compile();

    assert_eq!(engine.valid_set(), baseline.valid_set());
}

#[test]
fn test_compile_with_contradictory_vector() {
    let mut engine = base_engine();
    engine.add_rule("x1 => x2").unwrap();
    engine.add_rule("x2 => x3").unwrap();
    engine.add_state_vector(StateVector::empty());

    assert!(engine.valid_set().is_none());
    engine.compile();
    assert!(engine.is_contradiction());

    // Queries against a contradictory valid set fail.
    assert!(engine.get_variable_value("x1").is_err());
}

#[test]
fn test_workflow() {
    let mut engine = Engine::new(&["x1", "x2", "x3"]).unwrap();
    engine.add_rule("x1 => x2").unwrap();
    engine.add_rule("x2 => x3").unwrap();
    engine.compile();

    // Nothing is known about x2 without evidence.
    assert_eq!(engine.get_variable_value("x2").unwrap(), None);

    let result = engine.predict(&[("x1", true)]).unwrap();
    assert_eq!(result.value("x3").unwrap(), Some(true));

    let result = engine.predict(&[("x3", false)]).unwrap();
    assert_eq!(result.value("x1").unwrap(), Some(false));

    let result = engine.predict(&[("x2", true), ("x3", false)]).unwrap();
    assert!(result.is_contradiction());
}

#[test]
fn test_compile_lifecycle() {
    let mut engine = Engine::new(&["x1", "x2", "x3"]).unwrap();

    // 1. Initial state: not compiled, no valid set.
    assert!(!engine.is_compiled());
    assert!(engine.valid_set().is_none());

    // 2. Add one rule and compile.
    engine.add_rule("x1 => x2").unwrap();
    engine.compile();

    // 3. After the first compile the bookkeeping moves over.
    assert!(engine.is_compiled());
    assert!(engine.uncompiled_rules().is_empty());
    assert!(engine.state_vectors().is_empty());
    assert_eq!(engine.compiled_rules().len(), 1);
    let expected = StateVector::new(vec![Cube::new(&[], &[1]), Cube::new(&[1, 2], &[])]);
    assert_eq!(engine.valid_set(), Some(&expected));

    // 4. Adding another rule invalidates the compiled state.
    engine.add_rule("x2 => x3").unwrap();
    assert!(!engine.is_compiled());
    assert_eq!(engine.uncompiled_rules().len(), 1);
    assert_eq!(engine.state_vectors().len(), 1);
    assert_eq!(engine.compiled_rules().len(), 1);

    // 5. Re-compiling multiplies the new rule with the previous valid set.
    engine.compile();
    assert!(engine.is_compiled());
    assert!(engine.uncompiled_rules().is_empty());
    assert_eq!(engine.compiled_rules().len(), 2);
    let expected = StateVector::new(vec![Cube::new(&[], &[1, 2]), Cube::new(&[2, 3], &[])]);
    assert_eq!(engine.valid_set(), Some(&expected));

    // 6. The cumulative knowledge chains through both rules.
    let result = engine.predict(&[("x1", true)]).unwrap();
    assert_eq!(result.value("x3").unwrap(), Some(true));
}

#[test]
fn test_predict_without_compiling() {
    let mut compiled = Engine::new(&["x1", "x2", "x3"]).unwrap();
    compiled.add_rule("x1 => x2").unwrap();
    compiled.add_rule("x2 => x3").unwrap();
    compiled.compile();

    let mut uncompiled = Engine::new(&["x1", "x2", "x3"]).unwrap();
    uncompiled.add_rule("x1 => x2").unwrap();
    uncompiled.add_rule("x2 => x3").unwrap();

    let evidence = [("x1", true)];
    let from_compiled = compiled.predict(&evidence).unwrap();
    let from_uncompiled = uncompiled.predict(&evidence).unwrap();
    assert_eq!(
        from_compiled.state_vector().simplify(None, true),
        from_uncompiled.state_vector().simplify(None, true)
    );
    // Predicting does not compile the engine.
    assert!(!uncompiled.is_compiled());
}

#[test]
fn test_predict_on_partially_compiled_engine() {
    let mut engine = Engine::new(&["x1", "x2", "x3"]).unwrap();
    engine.add_rule("x1 => x2").unwrap();
    engine.compile();
    engine.add_rule("x2 => x3").unwrap();

    // The previous valid set still participates before the re-compile.
    let result = engine.predict(&[("x1", true)]).unwrap();
    assert_eq!(result.value("x3").unwrap(), Some(true));
}

#[test]
fn test_predict_unknown_variable() {
    let engine = base_engine();
    assert!(engine.predict(&[("nope", true)]).is_err());
}

#[test]
fn test_get_variable_value_requires_compile() {
    let mut engine = base_engine();
    engine.add_rule("x1 => x2").unwrap();
    assert_eq!(
        engine.get_variable_value("x1").unwrap_err(),
        EngineError::NotCompiled
    );

    engine.compile();
    assert_eq!(engine.get_variable_value("x1").unwrap(), None);

    assert!(matches!(
        engine.get_variable_value("nope").unwrap_err(),
        EngineError::UnknownVariable { .. }
    ));
}

#[test]
fn test_intermediate_sizes_are_recorded() {
    let mut engine = base_engine();
    engine.add_rule("x1 => x2").unwrap();
    engine.add_rule("x2 => x3").unwrap();
    engine.compile();

    assert_eq!(engine.intermediate_sizes().len(), 1);
    let stats = engine.intermediate_size_stats();
    assert_eq!(stats.num_entries, 1);
    assert!(stats.max >= 1);

    // Prediction sizes travel on the prediction, not the engine.
    let prediction = engine.predict(&[("x1", true)]).unwrap();
    assert_eq!(prediction.intermediate_sizes().len(), 1);
    assert_eq!(engine.intermediate_sizes().len(), 1);
}

#[test]
fn test_conflicting_evidence_is_a_contradiction() {
    let mut engine = base_engine();
    engine
        .add_evidence(&[("x1", true), ("x1", false)])
        .unwrap();
    engine.compile();
    assert!(engine.is_contradiction());
}
