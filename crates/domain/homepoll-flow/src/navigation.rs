//! Explicit wizard state and navigation targets.
//!
//! Each page load reconstructs its position from URL parameters; these
//! types are the one place that mapping lives. Handlers translate a
//! `Navigation` into a redirect and nothing else.

use url::form_urlencoded;

/// Positions in the survey wizard.
///
/// Transitions: `Entry → (Step1 | Step2)`, `Step1 → Step2` on a
/// successful insert, `Step2 → (Step3 | Success)`, `Step3 → Success`
/// on a successful update/insert (a failed step 3 re-renders in place).
/// `Success` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyStep {
    Entry,
    Step1,
    Step2,
    Step3,
    Success,
}

impl SurveyStep {
    pub fn path(&self) -> &'static str {
        match self {
            SurveyStep::Entry => "/",
            SurveyStep::Step1 => "/survey/step1",
            SurveyStep::Step2 => "/survey/step2",
            SurveyStep::Step3 => "/survey/step3",
            SurveyStep::Success => "/survey/success",
        }
    }
}

/// Where the visitor goes next, with the parameters the next page needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavParams {
    pub range: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub step: SurveyStep,
    pub params: NavParams,
}

impl Navigation {
    pub fn to(step: SurveyStep) -> Self {
        Self { step, params: NavParams::default() }
    }

    pub fn with_range(mut self, range: Option<impl Into<String>>) -> Self {
        self.params.range = range.map(Into::into);
        self
    }

    pub fn with_email(mut self, email: Option<impl Into<String>>) -> Self {
        self.params.email = email.map(Into::into);
        self
    }

    pub fn with_token(mut self, token: Option<impl Into<String>>) -> Self {
        self.params.token = token.map(Into::into);
        self
    }

    /// Render as a redirect target, query parameters included.
    pub fn location(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(range) = &self.params.range {
            query.append_pair("range", range);
        }
        if let Some(email) = &self.params.email {
            query.append_pair("email", email);
        }
        if let Some(token) = &self.params.token {
            query.append_pair("sid", token);
        }
        let query = query.finish();
        if query.is_empty() {
            self.step.path().to_string()
        } else {
            format!("{}?{}", self.step.path(), query)
        }
    }
}
