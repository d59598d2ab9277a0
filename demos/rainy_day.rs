//! Example: a complete inference scenario about whether to take an umbrella

use vector_logic::Engine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Running Rainy Day Inference Scenario ---\n");

    // 1. Define the variables of the logical world and create the engine.
    let variables = [
        "sky_is_grey",
        "humidity_is_high",
        "wind_is_strong",
        "it_will_rain",
        "take_umbrella",
    ];
    let mut engine = Engine::with_name(&variables, "Rainy Day Advisor")?;

    // 2. Add the knowledge base as logical rules.
    println!("[Step 1] Adding logical rules to the knowledge base...");
    engine.add_rule("sky_is_grey && humidity_is_high => it_will_rain")?;
    engine.add_rule("it_will_rain => take_umbrella")?;
    engine.add_rule("wind_is_strong = !take_umbrella")?;

    // 3. Compile all the rules into a single valid set.
    println!("[Step 2] Compiling the knowledge base...\n");
    engine.compile();
    println!("{}", engine);

    // 4. Scenario A: clear conditions for rain.
    println!("--- Scenario A ---");
    let evidence = [("sky_is_grey", true), ("humidity_is_high", true)];
    println!("Evidence: the sky is grey and humidity is high.");
    let result = engine.predict(&evidence)?;
    println!("Resulting state vector:\n{}", result.render(4));
    if result.is_contradiction() {
        println!("Contradictory evidence!");
    } else {
        println!(
            "Prediction for 'it_will_rain':  {:?}",
            result.value("it_will_rain")?
        );
        println!(
            "Prediction for 'take_umbrella': {:?}",
            result.value("take_umbrella")?
        );
    }

    // 5. Scenario B: conflicting conditions. Rain demands an umbrella, but
    // strong wind forbids one.
    println!("\n--- Scenario B ---");
    let evidence = [
        ("sky_is_grey", true),
        ("humidity_is_high", true),
        ("wind_is_strong", true),
    ];
    println!("Evidence: grey sky, high humidity, AND strong wind.");
    let result = engine.predict(&evidence)?;
    println!("Resulting state vector:\n{}", result.render(4));
    if result.is_contradiction() {
        println!("Logical contradiction, as expected.");
    }

    // 6. Scenario C: querying the base knowledge without evidence.
    println!("\n--- Scenario C ---");
    let variables = [
        "i_see_you",
        "i_am_in_the_office",
        "sun_is_shining",
        "need_umbrella",
    ];
    let mut engine = Engine::with_name(&variables, "Sunny Day Advisor")?;
    engine.add_rule("i_see_you => sun_is_shining")?;
    engine.add_rule("i_see_you = !i_am_in_the_office")?;
    engine.add_rule("sun_is_shining => !need_umbrella")?;
    engine.add_rule("i_am_in_the_office => !need_umbrella")?;
    engine.compile();

    let need_umbrella = engine.get_variable_value("need_umbrella")?;
    println!(
        "Knowing nothing at all, 'need_umbrella' is {:?} (both branches rule it out).",
        need_umbrella
    );

    Ok(())
}
