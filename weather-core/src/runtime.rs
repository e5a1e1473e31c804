use tracing::debug;

use crate::{
    LookupClient,
    form::{Effect, LookupForm, Msg, update},
};

/// Execute one effect against the service and turn its outcome into a message.
pub async fn run_effect(client: &dyn LookupClient, effect: Effect) -> Msg {
    match effect {
        Effect::FetchWeather {
            generation,
            identifier,
        } => {
            debug!(generation, %identifier, "running lookup");
            let outcome = client.fetch(&identifier).await;
            Msg::LookupFinished {
                generation,
                outcome,
            }
        }
    }
}

/// Submit the form's current identifier and wait for the lookup to settle.
///
/// The returned form is never left `Loading` unless the submit was rejected
/// before a request was issued (in which case the state is unchanged).
pub async fn submit(client: &dyn LookupClient, form: LookupForm) -> LookupForm {
    let (mut form, effects) = update(form, Msg::Submitted);
    for effect in effects {
        let msg = run_effect(client, effect).await;
        form = update(form, msg).0;
    }
    form
}

/// One-shot lookup on a fresh form.
pub async fn lookup(client: &dyn LookupClient, identifier: &str) -> LookupForm {
    let (form, _) = update(LookupForm::new(), Msg::IdentifierChanged(identifier.to_string()));
    submit(client, form).await
}
