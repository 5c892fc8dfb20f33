//! Purpose: Convenience walks over the API built on `FanboxClient`.
//! Exports: `browsable_posts`, `supporting_creators`, `unrestricted_posts`, `paid_in_month`.
//! Role: Pagination and filtering helpers; the pure cores are separated from I/O.
//! Invariants: Calendar months are evaluated in JST (UTC+9), the platform's billing zone.
#![allow(clippy::result_large_err)]

use super::client::{FanboxClient, query_pairs};
use crate::core::error::Error;
use crate::model::post::{PostItem, PostListCreator};
use crate::model::user::{Payment, PaymentCreator};
use time::{OffsetDateTime, UtcOffset};

pub const JST: UtcOffset = match UtcOffset::from_hms(9, 0, 0) {
    Ok(offset) => offset,
    Err(_) => UtcOffset::UTC,
};

/// Every post of `creator_id` the session can read, across all pages.
pub fn browsable_posts(client: &FanboxClient, creator_id: &str) -> Result<Vec<PostItem>, Error> {
    let pages = client.post_paginate_creator(creator_id)?.node.body;
    let mut posts = Vec::new();
    for page in &pages {
        let pairs = query_pairs(page.as_str())?;
        let query: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        let list = client.get::<PostListCreator>("/post.listCreator", &query)?;
        if let Some(items) = list.node.body.items.into_present() {
            posts.extend(unrestricted_posts(items));
        }
    }
    tracing::debug!(creator = creator_id, pages = pages.len(), posts = posts.len(), "listed browsable posts");
    Ok(posts)
}

/// Creators paid during the JST calendar month containing `now`.
pub fn supporting_creators(
    client: &FanboxClient,
    now: OffsetDateTime,
) -> Result<Vec<PaymentCreator>, Error> {
    let payments = client.payment_list_paid()?.node.body;
    Ok(paid_in_month(&payments, now))
}

pub fn unrestricted_posts(items: Vec<PostItem>) -> Vec<PostItem> {
    items.into_iter().filter(PostItem::is_browsable).collect()
}

pub fn paid_in_month(payments: &[Payment], now: OffsetDateTime) -> Vec<PaymentCreator> {
    let now = now.to_offset(JST);
    payments
        .iter()
        .filter(|payment| paid_during(payment, now))
        .filter_map(|payment| payment.creator.as_present().cloned())
        .collect()
}

fn paid_during(payment: &Payment, now: OffsetDateTime) -> bool {
    let Some(stamp) = payment.payment_datetime.as_present() else {
        return false;
    };
    match stamp.parse() {
        Ok(paid) => {
            let paid = paid.to_offset(JST);
            paid.year() == now.year() && paid.month() == now.month()
        }
        Err(err) => {
            tracing::warn!(payment = %payment.id, error = %err, "skipping payment with unreadable datetime");
            false
        }
    }
}
