// src/ui/elements/mod.rs
pub mod app_view;
pub mod dashboard_view;
pub mod feedback_line;
pub mod login;
pub mod matrix_review;
pub mod settings_popup;
pub mod success_step;
pub mod top_panel;
pub mod upload_step;
