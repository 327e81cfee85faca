mod app;

use app::FlashcardsApp;
use flashcards_app::config::AppConfig;
use flashcards_app::database::db;
use flashcards_app::models::CardDraft;
use log::info;

fn seed_sample_cards(conn: &rusqlite::Connection) -> flashcards_app::Result<()> {
    if !db::get_all_cards(conn)?.is_empty() {
        return Ok(());
    }

    for (front, back) in [
        ("cześć", "hello"),
        ("dziękuję", "thank you"),
        ("proszę", "please"),
    ] {
        db::add_card(&CardDraft::new(front, back).with_category("Polish"), conn)?;
    }
    info!("Sample cards created");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();

    let conn = db::open_database(&config.database_path)?;

    if config.seed_sample_cards {
        seed_sample_cards(&conn)?;
    }

    info!(
        "Loaded {} cards, {} due",
        db::get_all_cards(&conn)?.len(),
        db::get_cards_due_for_review(&conn)?.len()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(config.window_size),
        ..Default::default()
    };
    eframe::run_native(
        "Flashcards",
        options,
        Box::new(|cc| Ok(Box::new(FlashcardsApp::new(conn, &cc.egui_ctx)))),
    )?;
    Ok(())
}
