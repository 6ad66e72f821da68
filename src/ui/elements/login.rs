// src/ui/elements/login.rs
use bevy_egui::egui;

use crate::auth::RequestLogin;
use crate::ui::UiViewState;

use super::app_view::UiEventWriters;

pub fn show_login(ctx: &egui::Context, view: &mut UiViewState, writers: &mut UiEventWriters) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.25);
            ui.heading("Aquagrid");
            ui.label("Survey sheet digitization");
            ui.add_space(16.0);

            let mut submit = false;
            egui::Grid::new("login_form").num_columns(2).spacing([8.0, 8.0]).show(ui, |ui| {
                ui.label("User");
                ui.add(egui::TextEdit::singleline(&mut view.login_user).desired_width(200.0));
                ui.end_row();

                ui.label("Password");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut view.login_password)
                        .password(true)
                        .desired_width(200.0),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                ui.end_row();
            });

            ui.add_space(8.0);
            if ui.button("Log in").clicked() {
                submit = true;
            }

            if submit {
                writers.login.write(RequestLogin {
                    user: view.login_user.clone(),
                    password: std::mem::take(&mut view.login_password),
                });
            }
        });
    });
}
