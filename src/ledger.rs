//! Friend request ledger.
//!
//! One state machine per unordered user pair: no record → pending →
//! accepted. The pair is claimed with SET NX on an order-normalized key, so
//! reciprocal or concurrent sends collide and exactly one record ever
//! exists. Acceptance rewrites the record and both friend sets in a single
//! MULTI/EXEC pipeline; a fault leaves either nothing or everything applied.

use redis::{AsyncCommands, aio::ConnectionManager};
use uuid::Uuid;

use crate::{
    database::{
        friends_key, get_doc, incoming_key, mget_docs, outgoing_key, pair_key, request_key,
        user_key,
    },
    directory::is_friend,
    error::AppError,
    models::{FriendRequest, IncomingRequest, OutgoingRequest, PublicProfile, RequestStatus, User},
};

/// Checks a send against already-fetched state. The self-check comes first:
/// `send(A, A)` is rejected no matter what the store holds.
pub fn validate_send(
    sender_id: &str,
    recipient_id: &str,
    recipient: Option<&User>,
    already_friends: bool,
) -> Result<(), AppError> {
    if sender_id == recipient_id {
        return Err(AppError::BadRequest(
            "You can't send a friend request to yourself",
        ));
    }
    if recipient.is_none() {
        return Err(AppError::NotFound("User not found"));
    }
    if already_friends {
        return Err(AppError::BadRequest("You are already friends"));
    }
    Ok(())
}

/// Checks an acceptance against the stored record. Only the recipient may
/// accept, and only the pending → accepted transition exists.
pub fn validate_accept<'a>(
    request: Option<&'a FriendRequest>,
    acting_user_id: &str,
) -> Result<&'a FriendRequest, AppError> {
    let request = request.ok_or(AppError::NotFound("Friend request not found"))?;

    if request.recipient != acting_user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to accept this request",
        ));
    }
    if request.status == RequestStatus::Accepted {
        return Err(AppError::BadRequest("Friend request already accepted"));
    }
    Ok(request)
}

/// Creates a pending request from the caller to `recipient_id`.
pub async fn send(
    conn: &mut ConnectionManager,
    sender_id: &str,
    recipient_id: &str,
) -> Result<FriendRequest, AppError> {
    let recipient: Option<User> = get_doc(conn, &user_key(recipient_id)).await?;
    let already_friends = is_friend(conn, sender_id, recipient_id).await?;
    validate_send(sender_id, recipient_id, recipient.as_ref(), already_friends)?;

    let request = FriendRequest {
        id: Uuid::new_v4().to_string(),
        sender: sender_id.to_string(),
        recipient: recipient_id.to_string(),
        status: RequestStatus::Pending,
    };

    // The pair guard is the atomic gate against duplicates, in either
    // direction and under concurrent sends.
    let claimed: bool = conn
        .set_nx(pair_key(sender_id, recipient_id), &request.id)
        .await?;
    if !claimed {
        return Err(AppError::BadRequest("Friend request already sent"));
    }

    let doc = serde_json::to_string(&request)?;
    let mut pipe = redis::pipe();
    pipe.atomic()
        .set(request_key(&request.id), doc)
        .ignore()
        .sadd(outgoing_key(&request.sender), &request.id)
        .ignore()
        .sadd(incoming_key(&request.recipient), &request.id)
        .ignore();
    let _: () = pipe.query_async(conn).await?;

    Ok(request)
}

/// Accepts a pending request on behalf of the caller. All-or-nothing: the
/// status rewrite, both friend-set adds, and the pending-index trims run in
/// one transaction.
pub async fn accept(
    conn: &mut ConnectionManager,
    acting_user_id: &str,
    request_id: &str,
) -> Result<FriendRequest, AppError> {
    let stored: Option<FriendRequest> = get_doc(conn, &request_key(request_id)).await?;
    let mut request = validate_accept(stored.as_ref(), acting_user_id)?.clone();
    request.status = RequestStatus::Accepted;

    let doc = serde_json::to_string(&request)?;
    let mut pipe = redis::pipe();
    pipe.atomic()
        .set(request_key(&request.id), doc)
        .ignore()
        .sadd(friends_key(&request.sender), &request.recipient)
        .ignore()
        .sadd(friends_key(&request.recipient), &request.sender)
        .ignore()
        .srem(incoming_key(&request.recipient), &request.id)
        .ignore()
        .srem(outgoing_key(&request.sender), &request.id)
        .ignore();
    let _: () = pipe.query_async(conn).await?;

    Ok(request)
}

/// Pending requests addressed to the caller, with sender profiles expanded.
pub async fn incoming(
    conn: &mut ConnectionManager,
    user_id: &str,
) -> Result<Vec<IncomingRequest>, AppError> {
    let requests = pending_requests(conn, &incoming_key(user_id)).await?;

    let mut out = Vec::with_capacity(requests.len());
    for request in requests {
        if let Some(sender) = get_doc::<User>(conn, &user_key(&request.sender)).await? {
            out.push(IncomingRequest {
                id: request.id,
                sender: PublicProfile::from(&sender),
                recipient: request.recipient,
                status: request.status,
            });
        }
    }
    Ok(out)
}

/// Pending requests the caller has sent, with recipient profiles expanded.
pub async fn outgoing(
    conn: &mut ConnectionManager,
    user_id: &str,
) -> Result<Vec<OutgoingRequest>, AppError> {
    let requests = pending_requests(conn, &outgoing_key(user_id)).await?;

    let mut out = Vec::with_capacity(requests.len());
    for request in requests {
        if let Some(recipient) = get_doc::<User>(conn, &user_key(&request.recipient)).await? {
            out.push(OutgoingRequest {
                id: request.id,
                sender: request.sender,
                recipient: PublicProfile::from(&recipient),
                status: request.status,
            });
        }
    }
    Ok(out)
}

async fn pending_requests(
    conn: &mut ConnectionManager,
    index_key: &str,
) -> Result<Vec<FriendRequest>, AppError> {
    let ids: Vec<String> = conn.smembers(index_key).await?;
    let keys: Vec<String> = ids.iter().map(|id| request_key(id)).collect();

    let mut requests: Vec<FriendRequest> = mget_docs(conn, &keys).await?;
    // Index membership implies pending.
    requests.retain(|request| request.status == RequestStatus::Pending);
    Ok(requests)
}
