use anyhow::Context;
use educards::database::CardStore;
use educards::models::stats::collection_stats;
use educards::models::scheduler::next_review_date;
use educards::models::study_session::start_due_session;
use educards::{Config, Difficulty, SqliteStore, select_due};

fn seed_sample_deck(store: &SqliteStore) -> anyhow::Result<()> {
    let deck = store.create_deck("Polish Vocabulary", "Everyday words")?;

    store.create_flashcard(&deck.id, "cześć", "hello", None)?;
    store.create_flashcard(&deck.id, "dziękuję", "thank you", Some(Difficulty::Medium))?;
    store.create_flashcard(&deck.id, "proszę", "please", Some(Difficulty::Hard))?;

    log::info!("Sample data created");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;

    if store.list_decks()?.is_empty() {
        seed_sample_deck(&store)?;
    }

    let now = store.current_date()?;
    let decks = store.list_decks()?;
    println!("Loaded {} decks ({})", decks.len(), now.format("%Y-%m-%d"));
    for deck in &decks {
        let cards = store.list_cards_for_deck(&deck.id)?;
        let stats = collection_stats(&cards);
        println!(
            "  - {} ({} cards, {} due, avg difficulty {})",
            deck.name,
            stats.total_cards,
            select_due(&cards, now).len(),
            stats.average_difficulty
        );
    }

    let Some(deck) = decks.first() else {
        return Ok(());
    };

    let mut session = start_due_session(&store, &deck.id, now, config.shuffle, config.seed)?;
    if session.current_card().is_none() {
        println!("No cards are due in '{}'", deck.name);
        return Ok(());
    }

    let record = store.create_study_session(&deck.id)?;
    let ratings = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
    let mut turn = 0;
    while let Some(card) = session.current_card() {
        println!("[{}%] {} -> {}", session.progress_percent(), card.front, card.back);
        session.flip()?;

        let rating = ratings[turn % ratings.len()];
        let report = session.answer_and_record_at(&store, rating.value(), now)?;
        match report.recorder_error {
            Some(err) => eprintln!("Review not saved: {err}"),
            None => {
                if let Some(next) = next_review_date(&report.answered.card) {
                    println!("    {} -> next review {}", rating, next.format("%Y-%m-%d"));
                }
            }
        }
        store.update_study_session(&record.id, session.stats(), session.is_completed())?;
        turn += 1;
    }

    println!("Study complete!");
    println!("{}", serde_json::to_string_pretty(session.stats())?);
    println!("Accuracy: {}%", session.stats().accuracy());
    Ok(())
}
