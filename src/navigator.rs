//! Lifecycle wrapper around application handlers
//!
//! Every inbound event is one turn: load (or create) the conversation's
//! [`Context`], run the handler with the context attached, then store the
//! context again. A failed handler leaves the stored context untouched.

mod event;

pub use event::{Event, EventKind};

use crate::codec::Namespace;
use crate::config::NavConfig;
use crate::context::{Context, ContextData, Scope, SendStrategy};
use crate::error::{NavError, NavResult};
use crate::keyboard::{Button, Labels};
use crate::menu::{self, MenuAction, MenuCallback};
use crate::registry::ViewRegistry;
use crate::store::ConversationStore;
use crate::transport::Transport;
use crate::view::{ConversationId, StateId};
use futures::future::BoxFuture;
use std::sync::Arc;

/// Future returned by a handler borrowing the context for `'a`
pub type HandlerFuture<'a, R> = BoxFuture<'a, NavResult<R>>;

/// Runs handlers of one context kind against its store, transport and views
pub struct Navigator<D: ContextData> {
    views: Arc<ViewRegistry<D>>,
    store: Arc<dyn ConversationStore>,
    transport: Arc<dyn Transport>,
    menu: Option<Namespace>,
    labels: Arc<Labels>,
    default_strategy: SendStrategy,
}

impl<D: ContextData> Navigator<D> {
    pub fn new<S, T>(views: ViewRegistry<D>, store: S, transport: T) -> Self
    where
        S: ConversationStore + 'static,
        T: Transport + 'static,
    {
        Self {
            views: Arc::new(views),
            store: Arc::new(store),
            transport: Arc::new(transport),
            menu: None,
            labels: Arc::new(Labels::default()),
            default_strategy: SendStrategy::default(),
        }
    }

    pub fn with_config(mut self, config: &NavConfig) -> Self {
        self.default_strategy = config.default_strategy;
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = Arc::new(labels);
        self
    }

    /// Enable BACK / FINISH menu buttons for this context kind
    pub fn bind_menu(&mut self) -> NavResult<()> {
        let namespace = menu::namespace(D::KIND)?;
        tracing::info!(kind = D::KIND, namespace = %namespace, "Registered context for menu routing");
        self.menu = Some(namespace);
        Ok(())
    }

    pub fn is_menu_bound(&self) -> bool {
        self.menu.is_some()
    }

    pub fn menu_button(&self, action: MenuAction) -> NavResult<Button> {
        let namespace = self
            .menu
            .as_ref()
            .ok_or(NavError::UnboundContext(D::KIND))?;
        Ok(menu::button(namespace, action, &self.labels)?)
    }

    /// Start a new context for the conversation, replacing any stored one,
    /// and run `handler` with it.
    pub async fn entry_point<F, R>(&self, event: Event, handler: F) -> NavResult<R>
    where
        F: for<'a> FnOnce(&'a mut Context<D>, Event) -> HandlerFuture<'a, R> + Send,
        R: Send,
    {
        let conversation = event.conversation.clone();
        let mut ctx = Context::new(D::default());
        ctx.set_default(self.default_strategy);
        self.persist(&conversation, &ctx).await?;
        tracing::info!(conversation_id = %conversation, kind = D::KIND, "Context started");
        self.run(ctx, event, handler).await
    }

    /// Run `handler` with the conversation's stored context.
    ///
    /// Fails with `EmptyContext` when the conversation has none.
    pub async fn inject<F, R>(&self, event: Event, handler: F) -> NavResult<R>
    where
        F: for<'a> FnOnce(&'a mut Context<D>, Event) -> HandlerFuture<'a, R> + Send,
        R: Send,
    {
        let ctx = self
            .load(&event.conversation)
            .await?
            .ok_or(NavError::EmptyContext)?;
        self.run(ctx, event, handler).await
    }

    /// Handle a BACK / FINISH button press.
    ///
    /// Returns `false` without touching the context when the event is not a
    /// menu callback of this context kind.
    pub async fn dispatch_menu(&self, event: Event) -> NavResult<bool> {
        let namespace = self
            .menu
            .as_ref()
            .ok_or(NavError::UnboundContext(D::KIND))?;
        let callback: MenuCallback = match event.token() {
            Some(token) if namespace.owns(token.as_str()) => namespace.decode(token.as_str())?,
            _ => return Ok(false),
        };

        tracing::debug!(
            conversation_id = %event.conversation,
            action = callback.action.as_str(),
            "Menu action"
        );
        self.inject(event, move |ctx, _| {
            Box::pin(async move {
                match callback.action {
                    MenuAction::Back => ctx.back().await,
                    MenuAction::Finish => ctx.finish().await,
                }
            })
        })
        .await?;
        Ok(true)
    }

    /// Stored context of the conversation, detached
    pub async fn load(&self, conversation: &ConversationId) -> NavResult<Option<Context<D>>> {
        let mut data = self.store.get_data(conversation).await?;
        match data.remove(D::KIND) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn current_state(&self, conversation: &ConversationId) -> NavResult<Option<StateId>> {
        Ok(self.store.get_state(conversation).await?)
    }

    async fn run<F, R>(&self, mut ctx: Context<D>, event: Event, handler: F) -> NavResult<R>
    where
        F: for<'a> FnOnce(&'a mut Context<D>, Event) -> HandlerFuture<'a, R> + Send,
        R: Send,
    {
        let conversation = event.conversation.clone();
        ctx.attach(self.scope(&conversation));
        let result = handler(&mut ctx, event).await;
        ctx.detach();

        match result {
            Ok(value) => {
                self.persist(&conversation, &ctx).await?;
                tracing::debug!(
                    conversation_id = %conversation,
                    state = ?ctx.current_state(),
                    depth = ctx.depth(),
                    "Context saved"
                );
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(
                    conversation_id = %conversation,
                    kind = D::KIND,
                    error = %e,
                    "Handler failed, context not saved"
                );
                Err(e)
            }
        }
    }

    async fn persist(&self, conversation: &ConversationId, ctx: &Context<D>) -> NavResult<()> {
        let value = serde_json::to_value(ctx)?;
        self.store.set_data(conversation, D::KIND, value).await?;
        Ok(())
    }

    fn scope(&self, conversation: &ConversationId) -> Scope<D> {
        Scope {
            conversation: conversation.clone(),
            store: Arc::clone(&self.store),
            transport: Arc::clone(&self.transport),
            views: Arc::clone(&self.views),
            menu: self.menu.clone(),
            labels: Arc::clone(&self.labels),
        }
    }
}
