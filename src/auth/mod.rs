// src/auth/mod.rs
// Demo login gate. There is no identity backend: one hardcoded credential pair
// unlocks the app and the user name is only used for attribution.

use bevy::prelude::*;

use crate::digitization::events::{OperationFeedback, RequestResetWorkflow};

pub const DEMO_USER: &str = "admin";
pub const DEMO_PASSWORD: &str = "admin123";

/// Name used when a commit is issued without anyone logged in (CLI, tests).
pub const ANONYMOUS_USER: &str = "anonymous";

pub fn check_credentials(user: &str, password: &str) -> bool {
    user.trim() == DEMO_USER && password == DEMO_PASSWORD
}

#[derive(Resource, Debug, Clone, Default)]
pub struct AuthSession {
    pub user: Option<String>,
}

impl AuthSession {
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn display_name(&self) -> &str {
        self.user.as_deref().unwrap_or(ANONYMOUS_USER)
    }
}

#[derive(Event, Debug, Clone)]
pub struct RequestLogin {
    pub user: String,
    pub password: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestLogout;

pub struct AuthPlugin;

impl Plugin for AuthPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AuthSession>()
            .add_event::<RequestLogin>()
            .add_event::<RequestLogout>()
            .add_systems(Update, (handle_login_request, handle_logout_request).chain());
    }
}

pub fn handle_login_request(
    mut events: EventReader<RequestLogin>,
    mut session: ResMut<AuthSession>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    for event in events.read() {
        if check_credentials(&event.user, &event.password) {
            info!("User '{}' logged in", event.user.trim());
            session.user = Some(event.user.trim().to_string());
        } else {
            warn!("Rejected login attempt for '{}'", event.user);
            feedback_writer.write(OperationFeedback::error("Invalid user or password"));
        }
    }
}

/// Logging out also drops whatever document was under review.
pub fn handle_logout_request(
    mut events: EventReader<RequestLogout>,
    mut session: ResMut<AuthSession>,
    mut reset_writer: EventWriter<RequestResetWorkflow>,
) {
    if events.read().last().is_none() {
        return;
    }
    if let Some(user) = session.user.take() {
        info!("User '{}' logged out", user);
    }
    reset_writer.write(RequestResetWorkflow);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digitization::systems::edits::handle_reset_workflow;
    use crate::digitization::workflow::{DigitizationState, WorkflowStep};

    #[test]
    fn only_the_demo_credential_passes() {
        assert!(check_credentials("admin", "admin123"));
        assert!(check_credentials(" admin ", "admin123"));
        assert!(!check_credentials("admin", "admin"));
        assert!(!check_credentials("", ""));
    }

    #[test]
    fn display_name_falls_back_to_anonymous() {
        assert_eq!(AuthSession::default().display_name(), "anonymous");
        let session = AuthSession { user: Some("admin".into()) };
        assert_eq!(session.display_name(), "admin");
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<AuthSession>()
            .add_event::<RequestLogin>()
            .add_event::<RequestLogout>()
            .add_event::<RequestResetWorkflow>()
            .add_event::<OperationFeedback>()
            .insert_resource(DigitizationState::with_zone("3"))
            .add_systems(
                Update,
                (handle_login_request, handle_logout_request, handle_reset_workflow).chain(),
            );
        app
    }

    #[test]
    fn login_then_logout_resets_workflow() {
        let mut app = test_app();
        app.world_mut().send_event(RequestLogin {
            user: "admin".into(),
            password: "admin123".into(),
        });
        app.update();
        assert!(app.world().resource::<AuthSession>().is_logged_in());

        app.world_mut().resource_mut::<DigitizationState>().step = WorkflowStep::Success;
        app.world_mut().send_event(RequestLogout);
        app.update();

        assert!(!app.world().resource::<AuthSession>().is_logged_in());
        let state = app.world().resource::<DigitizationState>();
        assert_eq!(state.step, WorkflowStep::Upload);
        assert_eq!(state.zone_id, "3");
    }

    #[test]
    fn bad_login_reports_feedback() {
        let mut app = test_app();
        app.world_mut().send_event(RequestLogin {
            user: "admin".into(),
            password: "nope".into(),
        });
        app.update();
        assert!(!app.world().resource::<AuthSession>().is_logged_in());
        let events = app.world().resource::<Events<OperationFeedback>>();
        let mut cursor = events.get_cursor();
        let messages: Vec<_> = cursor.read(events).collect();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_error);
    }
}
