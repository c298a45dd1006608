use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::api::schemas::messaging::{ContactResponse, ConversationResponse, MessageResponse, PageQuery};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

/// One entry per peer thread, newest activity first.
pub async fn list_conversations(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse> {
    let conversations = state.message_service.conversations(actor.user_id).await?;
    Ok(Json(conversations.into_iter().map(ConversationResponse::from).collect::<Vec<_>>()))
}

pub async fn conversation_messages(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(other_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = state.message_service.page(query.limit, query.before);
    let messages = state.message_service.conversation_with(actor.user_id, other_id, page).await?;
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect::<Vec<_>>()))
}

pub async fn list_contacts(State(state): State<AppState>, AuthUser(actor): AuthUser) -> Result<impl IntoResponse> {
    let contacts = state.message_service.contacts(actor.user_id).await?;
    Ok(Json(contacts.into_iter().map(ContactResponse::from).collect::<Vec<_>>()))
}
