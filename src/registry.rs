//! View registry: which render function draws which state

use crate::context::{Context, ContextData};
use crate::error::{NavError, NavResult};
use crate::view::{Response, StateId};
use std::collections::HashMap;
use std::sync::Arc;

/// Pure function drawing one state of a context kind
pub type Renderer<D> = Arc<dyn Fn(&Context<D>) -> NavResult<Response> + Send + Sync>;

/// Render functions of one context kind, keyed by state.
///
/// Built once at startup and handed to the [`Navigator`](crate::Navigator).
pub struct ViewRegistry<D> {
    renderers: HashMap<StateId, Renderer<D>>,
}

impl<D: ContextData> ViewRegistry<D> {
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Register the render function for `state`. A state can be registered once.
    pub fn register<F>(&mut self, state: impl Into<StateId>, render: F) -> NavResult<()>
    where
        F: Fn(&Context<D>) -> NavResult<Response> + Send + Sync + 'static,
    {
        let state = state.into();
        if self.renderers.contains_key(&state) {
            return Err(NavError::DuplicateResponder(state));
        }
        tracing::debug!(kind = D::KIND, state = %state, "Registered responder");
        self.renderers.insert(state, Arc::new(render));
        Ok(())
    }

    /// Chainable form of [`register`](Self::register)
    pub fn with<F>(mut self, state: impl Into<StateId>, render: F) -> NavResult<Self>
    where
        F: Fn(&Context<D>) -> NavResult<Response> + Send + Sync + 'static,
    {
        self.register(state, render)?;
        Ok(self)
    }

    pub fn get(&self, state: &StateId) -> Option<&Renderer<D>> {
        self.renderers.get(state)
    }

    pub fn contains(&self, state: &StateId) -> bool {
        self.renderers.contains_key(state)
    }

    /// Render `state` against `ctx`
    pub fn render(&self, ctx: &Context<D>, state: &StateId) -> NavResult<Response> {
        let renderer = self
            .get(state)
            .ok_or_else(|| NavError::NoResponderFound(state.clone()))?;
        renderer(ctx)
    }

    pub fn states(&self) -> impl Iterator<Item = &StateId> {
        self.renderers.keys()
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl<D: ContextData> Default for ViewRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Greeting {
        name: String,
    }

    impl ContextData for Greeting {
        const KIND: &'static str = "Greeting";
    }

    fn registry() -> ViewRegistry<Greeting> {
        ViewRegistry::new()
            .with("main", |ctx: &Context<Greeting>| {
                Ok(Response::text(format!("Hello, {}", ctx.data().name)))
            })
            .unwrap()
    }

    #[test]
    fn test_render_uses_context_data() {
        let views = registry();
        let mut ctx = Context::new(Greeting::default());
        ctx.data_mut().name = "Ann".to_string();

        let response = views.render(&ctx, &StateId::new("main")).unwrap();
        assert_eq!(response.payload.text(), "Hello, Ann");
    }

    #[test]
    fn test_missing_state() {
        let views = registry();
        let ctx = Context::new(Greeting::default());
        let err = views.render(&ctx, &StateId::new("nope")).unwrap_err();
        assert!(matches!(err, NavError::NoResponderFound(s) if s.as_str() == "nope"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut views = registry();
        let err = views
            .register("main", |_: &Context<Greeting>| Ok(Response::text("again")))
            .unwrap_err();
        assert!(matches!(err, NavError::DuplicateResponder(_)));
        assert_eq!(views.len(), 1);
    }
}
