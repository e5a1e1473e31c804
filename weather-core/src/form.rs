//! The lookup form: identifier input plus a mutually exclusive view state.
//!
//! All transitions go through the pure [`update`] function. Network work is
//! described by [`Effect`] values and executed elsewhere (see
//! [`crate::runtime`]), which feeds the outcome back as a [`Msg`].

use tracing::debug;

use crate::{FormError, LookupError, LookupResult};

/// Token handed out per submission. Only the latest one may resolve the form.
pub type Generation = u64;

pub type LookupOutcome = Result<LookupResult, LookupError>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Success(Box<LookupResult>),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&LookupResult> {
        match self {
            ViewState::Success(result) => Some(result.as_ref()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The identifier field was edited; carries the full new value.
    IdentifierChanged(String),
    /// The user asked to look up the current identifier.
    Submitted,
    /// A fetch started by a previous submission settled.
    LookupFinished {
        generation: Generation,
        outcome: LookupOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchWeather {
        generation: Generation,
        identifier: String,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LookupForm {
    identifier: String,
    state: ViewState,
    generation: Generation,
}

impl LookupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Generation of the most recent submission; 0 before the first one.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Replace the identifier as typed. No trimming or validation.
    pub fn set_identifier(&mut self, value: impl Into<String>) {
        self.identifier = value.into();
    }

    /// Enter `Loading` for a new generation, dropping any previous error or result.
    pub fn submit(&mut self) -> Result<Effect, FormError> {
        if self.identifier.is_empty() {
            return Err(FormError::EmptyIdentifier);
        }

        self.generation += 1;
        self.state = ViewState::Loading;

        Ok(Effect::FetchWeather {
            generation: self.generation,
            identifier: self.identifier.clone(),
        })
    }

    /// Resolve the pending submission. Returns `false` when the outcome belongs
    /// to a superseded (or already resolved) generation and was ignored.
    pub fn resolve(&mut self, generation: Generation, outcome: LookupOutcome) -> bool {
        if generation != self.generation || !self.state.is_loading() {
            debug!(
                generation,
                current = self.generation,
                "ignoring outcome of a superseded lookup"
            );
            return false;
        }

        self.state = match outcome {
            Ok(result) => ViewState::Success(Box::new(result)),
            Err(err) => ViewState::Error(err.to_string()),
        };
        true
    }
}

/// Pure update function: applies a message to the form and returns any effects.
pub fn update(mut form: LookupForm, msg: Msg) -> (LookupForm, Vec<Effect>) {
    let effects = match msg {
        Msg::IdentifierChanged(value) => {
            form.set_identifier(value);
            Vec::new()
        }
        Msg::Submitted => match form.submit() {
            Ok(effect) => vec![effect],
            Err(err) => {
                debug!(error = %err, "submit ignored");
                Vec::new()
            }
        },
        Msg::LookupFinished {
            generation,
            outcome,
        } => {
            form.resolve(generation, outcome);
            Vec::new()
        }
    };

    (form, effects)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted(identifier: &str) -> (LookupForm, Vec<Effect>) {
        let (form, _) = update(LookupForm::new(), Msg::IdentifierChanged(identifier.into()));
        update(form, Msg::Submitted)
    }

    #[test]
    fn starts_idle() {
        let form = LookupForm::new();
        assert_eq!(form.state(), &ViewState::Idle);
        assert_eq!(form.generation(), 0);
    }

    #[test]
    fn identifier_is_kept_verbatim() {
        let (form, effects) = update(LookupForm::new(), Msg::IdentifierChanged("  ab c ".into()));
        assert_eq!(form.identifier(), "  ab c ");
        assert!(effects.is_empty());
    }

    #[test]
    fn submit_enters_loading_and_emits_fetch() {
        let (form, effects) = submitted("abc123");

        assert!(form.state().is_loading());
        assert_eq!(
            effects,
            vec![Effect::FetchWeather {
                generation: 1,
                identifier: "abc123".into()
            }]
        );
    }

    #[test]
    fn empty_identifier_is_rejected_without_state_change() {
        let mut form = LookupForm::new();
        assert_eq!(form.submit(), Err(FormError::EmptyIdentifier));

        let (form, effects) = update(form, Msg::Submitted);
        assert_eq!(form.state(), &ViewState::Idle);
        assert_eq!(form.generation(), 0);
        assert!(effects.is_empty());
    }

    #[test]
    fn resubmit_clears_previous_error() {
        let (form, _) = submitted("x");
        let (form, _) = update(
            form,
            Msg::LookupFinished {
                generation: 1,
                outcome: Err(LookupError::Rejected {
                    status: 404,
                    message: "Weather data not found".into(),
                }),
            },
        );
        assert_eq!(form.state().error(), Some("Weather data not found"));

        let (form, effects) = update(form, Msg::Submitted);
        assert_eq!(form.state(), &ViewState::Loading);
        assert_eq!(form.state().error(), None);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn stale_outcome_is_ignored() {
        let (form, _) = submitted("first");
        let (form, _) = update(form, Msg::IdentifierChanged("second".into()));
        let (form, _) = update(form, Msg::Submitted);
        assert_eq!(form.generation(), 2);

        let (form, _) = update(
            form,
            Msg::LookupFinished {
                generation: 1,
                outcome: Ok(LookupResult::default()),
            },
        );
        assert!(form.state().is_loading());

        let (form, _) = update(
            form,
            Msg::LookupFinished {
                generation: 2,
                outcome: Err(LookupError::transport("refused")),
            },
        );
        assert_eq!(
            form.state().error(),
            Some("Network error: Could not connect to the server")
        );
    }

    #[test]
    fn outcome_is_applied_only_once() {
        let (mut form, _) = submitted("x");
        assert!(form.resolve(1, Ok(LookupResult::default())));
        assert!(!form.resolve(1, Err(LookupError::transport("late"))));
        assert!(form.state().result().is_some());
    }
}
