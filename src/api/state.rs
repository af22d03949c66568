//! Shared state for the Web API server.
//!
//! Owned by the router and handed to handlers through axum `State`; nothing
//! here is global.

use std::sync::{Arc, Mutex, MutexGuard};

use super::auth::SessionAuth;
use crate::board::{DragController, TaskStore};
use crate::error::{AppError, Result};
use crate::items::ItemService;

/// Task store plus the drag session that operates on it
pub struct BoardState {
    pub store: TaskStore,
    pub drag: DragController,
}

#[derive(Clone)]
pub struct AppState {
    board: Arc<Mutex<BoardState>>,
    pub items: Arc<ItemService>,
    pub auth: Arc<SessionAuth>,
}

impl AppState {
    pub fn new(store: TaskStore, items: ItemService, auth: SessionAuth) -> Self {
        Self {
            board: Arc::new(Mutex::new(BoardState {
                store,
                drag: DragController::new(),
            })),
            items: Arc::new(items),
            auth: Arc::new(auth),
        }
    }

    /// Lock the board for one synchronous operation. Never hold across `.await`.
    pub fn board(&self) -> Result<MutexGuard<'_, BoardState>> {
        self.board
            .lock()
            .map_err(|_| AppError::storage("board lock poisoned"))
    }
}
