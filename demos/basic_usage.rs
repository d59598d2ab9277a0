//! Example: basic usage and the compile-or-not trade-off
//!
//! Compiling multiplies all rules once into a single valid set, which makes
//! every later prediction a single product - the right choice for repeated
//! queries. A one-off query can skip compiling: the evidence then joins the
//! scheduling, and a restrictive assignment keeps the intermediates small.

use vector_logic::Engine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let variables = ["x1", "x2", "x3", "x4"];

    // --- Scenario A: pre-compiling for repeated use ---
    println!("--- SCENARIO A: Pre-compiling for Repeated Predictions ---\n");

    let mut engine = Engine::with_name(&variables, "My Simple Rule Engine")?;
    engine.add_rule("x1 = (x2 && x3)")?;
    engine.add_rule("x2 <= (!x3 || !x4)")?;
    engine.add_evidence(&[("x4", false)])?;

    println!("[Step A.1] Compiling the engine...");
    engine.compile();

    println!("\n[Step A.2] Inspecting the compiled valid set:");
    if let Some(valid_set) = engine.valid_set() {
        println!("{}", valid_set.render(Some(variables.len()), 4));
        println!(
            "Consolidated value of 'x1': {:?}",
            engine.get_variable_value("x1")?
        );
        println!(
            "Consolidated value of 'x2': {:?}",
            engine.get_variable_value("x2")?
        );
    }

    println!("\n[Step A.3] Running multiple fast predictions:");
    for evidence in [
        vec![("x1", false), ("x2", true)],
        vec![("x1", false), ("x3", true)],
    ] {
        println!("\nPredicting with evidence {:?}:", evidence);
        let result = engine.predict(&evidence)?;
        if result.is_contradiction() {
            println!("  Evidence contradicts the knowledge base.");
        } else {
            println!("  x3 = {:?}", result.value("x3")?);
        }
    }

    // --- Scenario B: on-the-fly prediction without compiling ---
    println!("\n\n--- SCENARIO B: On-the-Fly Prediction (No Pre-compilation) ---\n");

    let mut uncompiled = Engine::with_name(&variables, "On-the-Fly Engine")?;
    uncompiled.add_rule("x1 = (x2 && x3)")?;
    uncompiled.add_rule("x2 <= (!x3 || !x4)")?;
    uncompiled.add_evidence(&[("x4", false)])?;

    println!("[Step B.1] Running a single prediction without compiling:");
    let result = uncompiled.predict(&[("x1", false), ("x2", true)])?;
    if result.is_contradiction() {
        println!("  Evidence contradicts the knowledge base.");
    } else {
        println!("Resulting state vector:\n{}", result.render(4));
        println!("\n  x3 = {:?}", result.value("x3")?);
    }

    Ok(())
}
