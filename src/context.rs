//! Per-conversation navigation stack
//!
//! A [`Context`] keeps the stack of menus shown in one conversation. Moving
//! forward renders a state and pushes a frame, moving back pops frames and
//! restores the previous menu in place. The store's current state always
//! follows the top frame.
//!
//! A context is loaded from the store at the start of every turn and saved
//! at the end of it by the [`Navigator`](crate::Navigator). Navigation is only
//! possible while the navigator has it attached.

mod frame;

#[cfg(test)]
mod proptests;

pub use frame::{MenuFrame, SendStrategy};

use crate::codec::Namespace;
use crate::error::{NavError, NavResult};
use crate::keyboard::{Button, Labels};
use crate::menu::{self, MenuAction};
use crate::registry::ViewRegistry;
use crate::store::ConversationStore;
use crate::transport::{EditOutcome, Transport};
use crate::view::{ConversationId, StateId, ViewHandle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Application data carried by a context kind.
///
/// `KIND` names the kind: it is the key the context is stored under and the
/// suffix of its menu token namespace, so it must be unique per bot.
pub trait ContextData: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    const KIND: &'static str;
}

/// Collaborators a context talks to during one turn
pub(crate) struct Scope<D> {
    pub(crate) conversation: ConversationId,
    pub(crate) store: Arc<dyn ConversationStore>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) views: Arc<ViewRegistry<D>>,
    pub(crate) menu: Option<Namespace>,
    pub(crate) labels: Arc<Labels>,
}

impl<D> Clone for Scope<D> {
    fn clone(&self) -> Self {
        Self {
            conversation: self.conversation.clone(),
            store: Arc::clone(&self.store),
            transport: Arc::clone(&self.transport),
            views: Arc::clone(&self.views),
            menu: self.menu.clone(),
            labels: Arc::clone(&self.labels),
        }
    }
}

/// Navigation stack of one conversation plus its application data
#[derive(Serialize, Deserialize)]
#[serde(bound(serialize = "D: Serialize", deserialize = "D: DeserializeOwned"))]
pub struct Context<D> {
    frames: Vec<MenuFrame>,
    #[serde(default)]
    default_strategy: SendStrategy,
    data: D,
    #[serde(skip)]
    scope: Option<Scope<D>>,
}

impl<D: fmt::Debug> fmt::Debug for Context<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("frames", &self.frames)
            .field("default_strategy", &self.default_strategy)
            .field("data", &self.data)
            .field("attached", &self.scope.is_some())
            .finish()
    }
}

impl<D: ContextData> Default for Context<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D: ContextData> Context<D> {
    pub fn new(data: D) -> Self {
        Self {
            frames: Vec::new(),
            default_strategy: SendStrategy::default(),
            data,
            scope: None,
        }
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }

    pub fn frames(&self) -> &[MenuFrame] {
        &self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&MenuFrame> {
        self.frames.last()
    }

    /// State of the top frame, `None` when the stack is empty
    pub fn current_state(&self) -> Option<&StateId> {
        self.top().map(|frame| &frame.state)
    }

    pub fn default_strategy(&self) -> SendStrategy {
        self.default_strategy
    }

    /// Strategy used by [`advance`](Self::advance) when none is given
    pub fn set_default(&mut self, strategy: SendStrategy) {
        self.default_strategy = strategy;
    }

    pub fn is_attached(&self) -> bool {
        self.scope.is_some()
    }

    pub fn conversation(&self) -> Option<&ConversationId> {
        self.scope.as_ref().map(|scope| &scope.conversation)
    }

    pub(crate) fn attach(&mut self, scope: Scope<D>) {
        self.scope = Some(scope);
    }

    pub(crate) fn detach(&mut self) {
        self.scope = None;
    }

    fn scope(&self) -> NavResult<Scope<D>> {
        self.scope.clone().ok_or(NavError::OutOfScope)
    }

    /// Button that triggers `action` on this context kind.
    ///
    /// Fails with `UnboundContext` until the navigator's menu router is bound.
    pub fn menu_button(&self, action: MenuAction) -> NavResult<Button> {
        let scope = self.scope.as_ref().ok_or(NavError::OutOfScope)?;
        let namespace = scope
            .menu
            .as_ref()
            .ok_or(NavError::UnboundContext(D::KIND))?;
        Ok(menu::button(namespace, action, &scope.labels)?)
    }

    /// Render `target` and make it the top of the stack.
    ///
    /// Re-entering the state already on top always edits in place and leaves
    /// the depth unchanged. A new view replies to `cause` when given,
    /// otherwise to the current top view.
    pub async fn advance(
        &mut self,
        target: impl Into<StateId>,
        strategy: Option<SendStrategy>,
        cause: Option<ViewHandle>,
    ) -> NavResult<()> {
        let target = target.into();
        let scope = self.scope()?;
        if !scope.views.contains(&target) {
            return Err(NavError::NoResponderFound(target));
        }

        let previous = self.top().map(|frame| (frame.state.clone(), frame.view));
        let refresh = previous.as_ref().is_some_and(|(state, _)| *state == target);
        let strategy = if refresh {
            SendStrategy::Edit
        } else {
            strategy.unwrap_or(self.default_strategy)
        };

        let view = self.deliver(&scope, &target, strategy, cause).await?;
        scope
            .store
            .set_state(&scope.conversation, Some(&target))
            .await?;

        if refresh {
            self.retarget_top(view);
            tracing::debug!(
                conversation_id = %scope.conversation,
                state = %target,
                "Refreshed current menu"
            );
            return Ok(());
        }

        let fresh = previous.map_or(true, |(_, previous_view)| previous_view != view);
        tracing::debug!(
            conversation_id = %scope.conversation,
            state = %target,
            view = %view,
            fresh,
            depth = self.frames.len() + 1,
            "Advanced to menu"
        );
        self.frames.push(MenuFrame {
            view,
            state: target,
            fresh,
            cause,
        });
        Ok(())
    }

    /// Pop the top frame and restore the previous menu.
    ///
    /// Popping the last frame closes the menu entirely.
    pub async fn back(&mut self) -> NavResult<()> {
        let scope = self.scope()?;
        let popped = self.frames.pop().ok_or(NavError::EmptyStack)?;
        discard(&scope, &popped).await?;

        let Some(state) = self.current_state().cloned() else {
            tracing::debug!(conversation_id = %scope.conversation, "Menu closed by back");
            return self.unwind(&scope).await;
        };

        let view = self
            .deliver(&scope, &state, SendStrategy::Edit, None)
            .await?;
        scope
            .store
            .set_state(&scope.conversation, Some(&state))
            .await?;
        self.retarget_top(view);
        tracing::debug!(
            conversation_id = %scope.conversation,
            state = %state,
            depth = self.frames.len(),
            "Went back"
        );
        Ok(())
    }

    /// Go back until `target` is on top.
    ///
    /// When `target` is not in the history the whole stack is unwound and
    /// `HistoricalStateNotFound` is returned.
    pub async fn backoff_until(&mut self, target: impl Into<StateId>) -> NavResult<()> {
        let target = target.into();
        self.scope()?;
        while self.current_state() != Some(&target) {
            if self.frames.is_empty() {
                return Err(NavError::HistoricalStateNotFound(target));
            }
            self.back().await?;
        }
        Ok(())
    }

    /// Close every menu of this context and clear the current state
    pub async fn finish(&mut self) -> NavResult<()> {
        let scope = self.scope()?;
        self.unwind(&scope).await?;
        tracing::debug!(conversation_id = %scope.conversation, "Context finished");
        Ok(())
    }

    async fn unwind(&mut self, scope: &Scope<D>) -> NavResult<()> {
        while let Some(frame) = self.frames.pop() {
            discard(scope, &frame).await?;
        }
        scope.store.set_state(&scope.conversation, None).await?;
        Ok(())
    }

    /// Render `state` and put it on screen with `strategy`
    async fn deliver(
        &self,
        scope: &Scope<D>,
        state: &StateId,
        strategy: SendStrategy,
        cause: Option<ViewHandle>,
    ) -> NavResult<ViewHandle> {
        let response = scope.views.render(self, state)?;
        let current = self.top().map(|frame| frame.view);

        match (strategy, current) {
            (SendStrategy::Edit, Some(view)) => {
                match scope
                    .transport
                    .edit_existing(&scope.conversation, view, &response)
                    .await
                {
                    Ok(EditOutcome::Edited(edited)) => Ok(edited),
                    Ok(EditOutcome::Unchanged) => Ok(view),
                    Err(e) if e.kind.is_benign_for_edit() => {
                        tracing::info!(
                            conversation_id = %scope.conversation,
                            view = %view,
                            error = %e,
                            "Bad request trying to edit message"
                        );
                        Ok(view)
                    }
                    Err(e) => Err(e.into()),
                }
            }
            (SendStrategy::Edit, None) => {
                tracing::debug!(
                    conversation_id = %scope.conversation,
                    state = %state,
                    "Nothing to edit, sending a new message"
                );
                Ok(scope
                    .transport
                    .send_new(&scope.conversation, &response, cause)
                    .await?)
            }
            (SendStrategy::New, current) => Ok(scope
                .transport
                .send_new(&scope.conversation, &response, cause.or(current))
                .await?),
        }
    }

    fn retarget_top(&mut self, view: ViewHandle) {
        if let Some(top) = self.frames.last_mut() {
            top.view = view;
        }
    }
}

/// Delete the messages a popped frame owns
async fn discard<D>(scope: &Scope<D>, frame: &MenuFrame) -> NavResult<()> {
    if !frame.fresh {
        return Ok(());
    }
    delete_view(scope, frame.view).await?;
    if let Some(cause) = frame.cause {
        delete_view(scope, cause).await?;
    }
    Ok(())
}

async fn delete_view<D>(scope: &Scope<D>, view: ViewHandle) -> NavResult<()> {
    match scope.transport.delete(&scope.conversation, view).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind.is_benign_for_delete() => {
            tracing::info!(
                conversation_id = %scope.conversation,
                view = %view,
                error = %e,
                "Message to delete is already gone"
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
