use tiny_llm_core::{
    BASE_CORPUS, DEFAULT_PROMPT, GenerationOptions, RANK_LIMIT, build_model, generate_text, merge_corpus,
    rank_next_tokens,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Build the model from the built-in corpus
    let model = build_model(BASE_CORPUS);
    println!("Vocabulary size: {}", model.vocabulary_size());
    println!("Corpus tokens: {}", model.token_count());

    // Next token probabilities, based on the last character of the prompt
    // The fallback token (a space) is displayed as a visible glyph
    for candidate in rank_next_tokens(&model, DEFAULT_PROMPT, RANK_LIMIT) {
        println!("{} {:.2}%", candidate.display(), candidate.probability * 100.0);
    }

    // Generation with a seed is reproducible
    let options = GenerationOptions::default().with_max_tokens(120).with_seed(42);
    let first = generate_text(&model, DEFAULT_PROMPT, &options)?;
    let second = generate_text(&model, DEFAULT_PROMPT, &options)?;
    println!("Seeded: {}{}", DEFAULT_PROMPT, first);
    println!("Same seed, same text: {}", first == second);

    // Lower temperature sharpens, higher temperature flattens
    for temperature in [0.2, 0.85, 1.5] {
        let options = GenerationOptions::default().with_max_tokens(80).with_temperature(temperature).with_seed(7);
        println!("Temperature {:.2}: {}", temperature, generate_text(&model, DEFAULT_PROMPT, &options)?);
    }

    // Without a seed, every run differs
    let options = GenerationOptions::default().with_max_tokens(80);
    println!("Random seed: {}", generate_text(&model, DEFAULT_PROMPT, &options)?);

    // Temperature must be positive
    match generate_text(&model, DEFAULT_PROMPT, &options.clone().with_temperature(0.0)) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Temperature 0.0 is invalid: {e}"),
    }

    // Retraining builds a new model, the old one stays usable
    let retrained = merge_corpus(model.corpus(), "the zebra quietly quizzed the jazzy fox. ");
    println!("Vocabulary size after retraining: {} (was {})", retrained.vocabulary_size(), model.vocabulary_size());
    for candidate in rank_next_tokens(&retrained, "z", RANK_LIMIT) {
        println!("after 'z': {} {:.2}%", candidate.display(), candidate.probability * 100.0);
    }

    Ok(())
}
