//! Example: proving the importation-exportation rule of propositional logic
//!
//! (E1 -> (E2 -> E3)) is logically equivalent to ((E1 && E2) -> E3). The
//! proof introduces supplementary variables for the nested implications and
//! an indicator variable E8 for the proposition itself: if the compiled
//! knowledge base fixes E8 to true, the proposition is a tautology.

use vector_logic::Engine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Running Importation-Exportation Rule Proof ---\n");

    let variables: Vec<String> = (1..=8).map(|i| format!("E{}", i)).collect();

    let mut engine = Engine::with_name(&variables, "Logic Proof Engine")?;

    println!("[Step 1] Adding definitions for supplementary variables...");
    engine.add_rule("E4 = (E2 => E3)")?;
    engine.add_rule("E5 = (E1 => E4)")?;
    engine.add_rule("E7 = ((E1 && E2) => E3)")?;

    println!("[Step 2] Adding the proposition to prove (E5 => E7)...");
    engine.add_rule("E8 = (E5 => E7)")?;

    println!("[Step 3] Compiling the knowledge base...\n");
    engine.compile();
    println!("{}", engine);

    if engine.is_contradiction() {
        println!("Warning: the rule set contains a contradiction!");
        return Ok(());
    }

    println!("[Step 4] Checking the indicator variable E8...");
    match engine.get_variable_value("E8")? {
        Some(true) => {
            println!("E8 is identically true: (E5 => E7) is a tautology.");
            println!("This proves (E1 -> (E2 -> E3)) implies ((E1 && E2) -> E3).");
        }
        other => println!("Proof failed: E8 = {:?}", other),
    }

    // The stronger claim: E5 and E7 are equivalent.
    println!("\n[Step 5] Checking for equivalence (E5 = E7)...");
    let mut equivalence = Engine::new(&variables)?;
    equivalence.add_rule("E5 = (E1 => (E2 => E3))")?;
    equivalence.add_rule("E7 = ((E1 && E2) => E3)")?;
    equivalence.add_rule("E8 = (E5 = E7)")?;
    equivalence.compile();

    match equivalence.get_variable_value("E8")? {
        Some(true) => println!("E8 = true: E5 and E7 are logically equivalent."),
        other => println!("Equivalence check failed: E8 = {:?}", other),
    }

    // Evidence against the proven equivalence must contradict.
    println!("\n[Step 6] Predicting with contradictory evidence (E5, !E7)...");
    let result = equivalence.predict(&[("E5", true), ("E7", false)])?;
    if result.is_contradiction() {
        println!("Prediction resulted in a contradiction, as expected.");
    }

    Ok(())
}
