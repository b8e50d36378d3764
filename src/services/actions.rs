//! Placeholder form and portal actions.
//!
//! None of the site's apply/submit/register buttons are wired to a backend.
//! Invoking one only produces a "not implemented yet" notification.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AppError;
use crate::models::Page;

/// A user action that has no backend yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StubAction {
    ApplyNow,
    RequestInfo,
    RegisterEvent,
    Donate,
    SubscribeNewsletter,
    PortalLogin,
    SubmitAwardApplication,
    ScheduleVisit,
    SendMessage,
}

/// Notification shown in place of the real action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl StubAction {
    pub const ALL: [StubAction; 9] = [
        StubAction::ApplyNow,
        StubAction::RequestInfo,
        StubAction::RegisterEvent,
        StubAction::Donate,
        StubAction::SubscribeNewsletter,
        StubAction::PortalLogin,
        StubAction::SubmitAwardApplication,
        StubAction::ScheduleVisit,
        StubAction::SendMessage,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StubAction::ApplyNow => "apply-now",
            StubAction::RequestInfo => "request-info",
            StubAction::RegisterEvent => "register-event",
            StubAction::Donate => "donate",
            StubAction::SubscribeNewsletter => "subscribe-newsletter",
            StubAction::PortalLogin => "portal-login",
            StubAction::SubmitAwardApplication => "submit-award-application",
            StubAction::ScheduleVisit => "schedule-visit",
            StubAction::SendMessage => "send-message",
        }
    }

    /// Button label as shown on the page.
    pub fn label(self) -> &'static str {
        match self {
            StubAction::ApplyNow => "Apply Now",
            StubAction::RequestInfo => "Request Information",
            StubAction::RegisterEvent => "Register",
            StubAction::Donate => "Give Now",
            StubAction::SubscribeNewsletter => "Subscribe",
            StubAction::PortalLogin => "Sign In",
            StubAction::SubmitAwardApplication => "Submit Application",
            StubAction::ScheduleVisit => "Schedule a Visit",
            StubAction::SendMessage => "Send Message",
        }
    }

    /// Page that offers the action.
    pub fn page(self) -> Page {
        match self {
            StubAction::ApplyNow | StubAction::RequestInfo => Page::Admissions,
            StubAction::RegisterEvent => Page::Events,
            StubAction::Donate => Page::Giving,
            StubAction::SubscribeNewsletter => Page::News,
            StubAction::PortalLogin => Page::Portals,
            StubAction::SubmitAwardApplication => Page::AwardsApplication,
            StubAction::ScheduleVisit => Page::Visit,
            StubAction::SendMessage => Page::Contact,
        }
    }

    /// Run the action. Nothing is sent anywhere.
    pub fn invoke(self) -> Notification {
        log::info!("Stub action '{}' invoked on {}", self.name(), self.page());
        Notification {
            title: self.label().to_string(),
            message: format!("{} is not implemented yet.", self.label()),
        }
    }
}

impl fmt::Display for StubAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for StubAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        StubAction::ALL
            .into_iter()
            .find(|action| action.name() == needle)
            .ok_or_else(|| AppError::validation(format!("unknown action: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoke_returns_placeholder() {
        let note = StubAction::Donate.invoke();
        assert_eq!(note.title, "Give Now");
        assert_eq!(note.message, "Give Now is not implemented yet.");
    }

    #[test]
    fn test_names_parse_back() {
        for action in StubAction::ALL {
            assert_eq!(action.name().parse::<StubAction>().unwrap(), action);
        }
        assert_eq!(
            "portal_login".parse::<StubAction>().unwrap(),
            StubAction::PortalLogin
        );
        assert!("enroll".parse::<StubAction>().is_err());
    }

    #[test]
    fn test_awards_action_lives_on_application_page() {
        assert_eq!(
            StubAction::SubmitAwardApplication.page(),
            Page::AwardsApplication
        );
    }
}
