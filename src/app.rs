//! Main application UI and state management.
//! Handles card authoring, the card list, statistics and study sessions.

use chrono::{DateTime, Utc};
use eframe::egui;
use flashcards_app::database::db;
use flashcards_app::models::sm2::{format_interval, preview_intervals};
use flashcards_app::models::{
    Card, CardDraft, CardQuery, DifficultyBreakdown, Rating, Settings, SortBy, StudySession,
};
use flashcards_app::Result;
use log::warn;
use rusqlite::Connection;
use std::collections::HashSet;

/// Application screen states
#[derive(Default)]
enum AppScreen {
    #[default]
    Main,
    Study,
}

/// Main application state
pub struct FlashcardsApp {
    conn: Connection,
    settings: Settings,

    show_confirmation_dialog: bool,
    allowed_to_close: bool,

    cards: Vec<Card>,
    categories: Vec<String>,
    due_count: usize,
    query: CardQuery,
    selected_ids: HashSet<i64>,

    draft: CardDraft,
    editing_id: Option<i64>,

    current_screen: AppScreen,
    study_session: Option<StudySession>,

    current_date: Option<DateTime<Utc>>,

    show_stats_dialog: bool,
    message: Option<String>,
}

/// Formats a timestamp as YYYY-MM-DD
fn format_date(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d").to_string()
}

fn visuals_for(settings: &Settings) -> egui::Visuals {
    if settings.dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    }
}

impl eframe::App for FlashcardsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Main => self.render_main_screen(ctx),
            AppScreen::Study => self.render_study_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_stats_dialog {
            self.render_stats_window(ctx);
        }

        if let Some(message) = self.message.clone() {
            egui::Window::new("Something went wrong")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.message = None;
                    }
                });
        }
    }
}

impl FlashcardsApp {
    /// Creates the application around an open card store
    pub fn new(conn: Connection, ctx: &egui::Context) -> Self {
        let settings = db::load_settings(&conn).unwrap_or_else(|e| {
            warn!("Could not load settings, using defaults: {}", e);
            Settings::default()
        });
        ctx.set_visuals(visuals_for(&settings));

        let mut app = Self {
            conn,
            settings,
            show_confirmation_dialog: false,
            allowed_to_close: false,
            cards: Vec::new(),
            categories: Vec::new(),
            due_count: 0,
            query: CardQuery::default(),
            selected_ids: HashSet::new(),
            draft: CardDraft::default(),
            editing_id: None,
            current_screen: AppScreen::Main,
            study_session: None,
            current_date: None,
            show_stats_dialog: false,
            message: None,
        };
        app.refresh();
        app
    }

    /// Shows a store error to the user instead of dropping it
    fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{}", e);
                self.message = Some(e.to_string());
                None
            }
        }
    }

    /// Reloads everything the main screen shows from the store
    fn refresh(&mut self) {
        let loaded = (|| -> Result<_> {
            Ok((
                db::get_all_cards(&self.conn)?,
                db::list_categories(&self.conn)?,
                db::get_cards_due_for_review(&self.conn)?.len(),
                db::get_current_date(&self.conn)?,
            ))
        })();

        if let Some((cards, categories, due_count, current_date)) = self.report(loaded) {
            self.selected_ids.retain(|id| cards.iter().any(|c| c.id == *id));
            if self
                .query
                .category
                .as_ref()
                .is_some_and(|c| !categories.contains(c))
            {
                self.query.category = None;
            }
            self.cards = cards;
            self.categories = categories;
            self.due_count = due_count;
            self.current_date = Some(current_date);
        }
    }

    /// Renders the main screen with card management interface
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                let date = self
                    .current_date
                    .map(format_date)
                    .unwrap_or_else(|| "Unknown".to_string());
                ui.label(date);

                if ui.button("Next Day").clicked() {
                    let result = db::advance_day(&self.conn);
                    self.report(result);
                    self.refresh();
                }

                ui.separator();

                if ui.checkbox(&mut self.settings.dark_mode, "Dark mode").changed() {
                    ctx.set_visuals(visuals_for(&self.settings));
                    let result = db::save_settings(&self.settings, &self.conn);
                    self.report(result);
                }

                if ui.button("Statistics").clicked() {
                    self.show_stats_dialog = true;
                }
            });
            ui.separator();

            if ui
                .add_enabled(
                    self.due_count > 0,
                    egui::Button::new(format!("Study due cards ({})", self.due_count)),
                )
                .clicked()
            {
                self.start_study_session();
            }

            ui.separator();

            self.render_card_form(ui);

            ui.separator();

            self.render_card_list(ui);
        });
    }

    fn render_card_form(&mut self, ui: &mut egui::Ui) {
        ui.heading(if self.editing_id.is_some() {
            "Edit Card"
        } else {
            "New Card"
        });

        egui::Grid::new("card_form").num_columns(2).show(ui, |ui| {
            ui.label("Front:");
            ui.text_edit_singleline(&mut self.draft.front);
            ui.end_row();

            ui.label("Back:");
            ui.text_edit_multiline(&mut self.draft.back);
            ui.end_row();

            ui.label("Category:");
            ui.text_edit_singleline(&mut self.draft.category);
            ui.end_row();

            ui.label("Chapter:");
            ui.text_edit_singleline(&mut self.draft.chapter);
            ui.end_row();

            ui.label("Tags:");
            ui.text_edit_singleline(&mut self.draft.tags);
            ui.end_row();
        });

        let mut action_save = false;
        let mut action_cancel = false;

        ui.horizontal(|ui| {
            let label = if self.editing_id.is_some() {
                "Save Changes"
            } else {
                "Add Card"
            };
            if ui.button(label).clicked() {
                action_save = true;
            }
            if self.editing_id.is_some() && ui.button("Cancel").clicked() {
                action_cancel = true;
            }
        });

        if action_save {
            self.save_draft();
        }
        if action_cancel {
            self.editing_id = None;
            self.draft = CardDraft::default();
        }
    }

    fn save_draft(&mut self) {
        let result = match self.editing_id {
            Some(id) => db::update_card_content(id, &self.draft, &self.conn),
            None => db::add_card(&self.draft, &self.conn),
        };

        if self.report(result).is_some() {
            self.editing_id = None;
            self.draft = CardDraft::default();
            self.refresh();
        }
    }

    fn render_card_list(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.query.search);
        });

        ui.horizontal(|ui| {
            let selected_category = self
                .query
                .category
                .clone()
                .unwrap_or_else(|| "All categories".to_string());
            egui::ComboBox::from_label("Category")
                .selected_text(selected_category)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.query.category, None, "All categories");
                    for category in &self.categories {
                        ui.selectable_value(
                            &mut self.query.category,
                            Some(category.clone()),
                            category,
                        );
                    }
                });

            egui::ComboBox::from_label("Sort by")
                .selected_text(self.query.sort_by.label())
                .show_ui(ui, |ui| {
                    for sort_by in SortBy::ALL {
                        ui.selectable_value(&mut self.query.sort_by, sort_by, sort_by.label());
                    }
                });
        });

        let visible = self.query.apply(self.cards.clone());

        ui.horizontal(|ui| {
            ui.heading(format!("Cards ({})", visible.len()));
            if !self.selected_ids.is_empty()
                && ui
                    .button(format!("Delete selected ({})", self.selected_ids.len()))
                    .clicked()
            {
                let ids: Vec<i64> = self.selected_ids.iter().copied().collect();
                let result = db::delete_cards(&ids, &self.conn);
                if self.report(result).is_some() {
                    self.selected_ids.clear();
                    if self.editing_id.is_some_and(|id| ids.contains(&id)) {
                        self.editing_id = None;
                        self.draft = CardDraft::default();
                    }
                    self.refresh();
                }
            }
        });

        // Actions are applied after rendering to avoid borrowing conflicts
        let mut action_edit: Option<Card> = None;
        let mut action_toggle: Option<i64> = None;

        egui::ScrollArea::vertical()
            .id_source("card_list")
            .show(ui, |ui| {
                for card in &visible {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            let mut checked = self.selected_ids.contains(&card.id);
                            if ui.checkbox(&mut checked, "").changed() {
                                action_toggle = Some(card.id);
                            }
                            ui.vertical(|ui| {
                                ui.label(format!("Front: {}", card.front));
                                ui.label(format!("Back: {}", card.back));
                                if !card.category.is_empty() {
                                    ui.label(format!("Category: {}", card.category));
                                }
                                ui.label(format!(
                                    "Interval: {} | Ease: {:.2} | Due: {} | Errors: {}",
                                    format_interval(card.review.interval),
                                    card.review.ease_factor,
                                    format_date(card.review.due_date),
                                    card.review.error_count
                                ));
                            });
                            if ui.button("Edit").clicked() {
                                action_edit = Some(card.clone());
                            }
                        });
                    });
                }
            });

        if let Some(id) = action_toggle {
            if !self.selected_ids.remove(&id) {
                self.selected_ids.insert(id);
            }
        }
        if let Some(card) = action_edit {
            self.draft = CardDraft::from_card(&card);
            self.editing_id = Some(card.id);
        }
    }

    fn render_stats_window(&mut self, ctx: &egui::Context) {
        let breakdown = DifficultyBreakdown::from_cards(&self.cards);
        let mut open = true;

        egui::Window::new("Statistics")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(format!("Total cards: {}", breakdown.total()));
                ui.label(format!("Due now: {}", self.due_count));
                ui.separator();
                for rating in [Rating::Easy, Rating::Medium, Rating::Hard] {
                    ui.horizontal(|ui| {
                        ui.label(format!("{}: {}", rating.label(), breakdown.count(rating)));
                        ui.add(
                            egui::ProgressBar::new(breakdown.share(rating))
                                .desired_width(200.0)
                                .show_percentage(),
                        );
                    });
                }
            });

        if !open {
            self.show_stats_dialog = false;
        }
    }

    /// Renders the study screen with the card review interface
    fn render_study_screen(&mut self, ctx: &egui::Context) {
        let mut action_reveal = false;
        let mut action_rate: Option<Rating> = None;
        let mut action_back = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &self.study_session else {
                action_back = true;
                return;
            };

            ui.heading("Study");
            ui.label(session.phase_message());
            ui.label(format!(
                "Progress: {} / {} passed ({} remaining)",
                session.passed_count(),
                session.total_count(),
                session.remaining_count()
            ));

            ui.add_space(20.0);

            if session.is_completed() {
                ui.heading("Congratulations!");
                ui.label("You've reviewed every due card.");
                ui.add_space(20.0);
                if ui.button("Back to Main Screen").clicked() {
                    action_back = true;
                }
                return;
            }

            let Some(card) = session.current_card() else {
                return;
            };
            let show_answer = session.show_answer;

            ui.group(|ui| {
                ui.set_min_height(200.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.heading("Front:");
                    ui.label(&card.front);
                    ui.add_space(20.0);

                    if show_answer {
                        ui.heading("Back:");
                        ui.label(&card.back);
                    } else {
                        ui.label("(Click 'Show Answer' to reveal)");
                    }
                    ui.add_space(20.0);
                });
            });

            ui.add_space(20.0);

            if !show_answer {
                if ui.button("Show Answer").clicked() {
                    action_reveal = true;
                }
            } else if !session.is_current_passed() {
                ui.label("How well did you remember it?");
                ui.horizontal(|ui| {
                    for (rating, interval) in preview_intervals(&card.review) {
                        let label = format!("{} ({})", rating.label(), format_interval(interval));
                        if ui.button(label).clicked() {
                            action_rate = Some(rating);
                        }
                    }
                });
            }

            ui.add_space(20.0);

            if ui.button("Back to Main Screen").clicked() {
                action_back = true;
            }
        });

        // Execute deferred actions
        if action_reveal {
            if let Some(session) = &mut self.study_session {
                session.reveal_answer();
            }
        }
        if let Some(rating) = action_rate {
            self.rate_current_card(rating);
        }
        if action_back {
            self.current_screen = AppScreen::Main;
            self.study_session = None;
            self.refresh();
        }
    }

    fn rate_current_card(&mut self, rating: Rating) {
        let Some(session) = &mut self.study_session else {
            return;
        };
        let result = session.rate_current_card(rating, &self.conn);
        if result.is_ok() {
            session.next_card();
        }
        self.report(result);
    }

    /// Starts a study session with the cards due at the current date
    fn start_study_session(&mut self) {
        let due = db::get_cards_due_for_review(&self.conn);
        let Some(due_cards) = self.report(due) else {
            return;
        };

        if due_cards.is_empty() {
            self.refresh();
            return;
        }

        self.study_session = Some(StudySession::new_from_due_cards(due_cards));
        self.current_screen = AppScreen::Study;
    }
}
