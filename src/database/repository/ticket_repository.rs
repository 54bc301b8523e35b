//! Ticket log repository.
//!
//! Ids come from a counters document bumped with `$inc`, the usual Mongo
//! auto-increment pattern, so two concurrent adds never share an id.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use mongodb::bson::doc;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::Collection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::database::models::Ticket;
use crate::database::Database;

use super::TicketRepository;

/// Auto-increment state, one document per counter name.
#[derive(Debug, Serialize, Deserialize)]
struct Counter {
    #[serde(rename = "_id")]
    name: String,
    seq: i64,
}

/// MongoDB-backed [`TicketRepository`].
pub struct MongoTicketRepository {
    collection: Collection<Ticket>,
    counters: Collection<Counter>,
}

impl MongoTicketRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("tickets"),
            counters: db.collection("counters"),
        }
    }

    async fn next_id(&self) -> Result<i64> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .counters
            .find_one_and_update(doc! { "_id": "ticket_id" }, doc! { "$inc": { "seq": 1 } })
            .with_options(options)
            .await?
            .context("ticket counter upsert returned no document")?;

        Ok(counter.seq)
    }
}

#[async_trait]
impl TicketRepository for MongoTicketRepository {
    async fn add(&self, chat_id: i64, description: &str) -> Result<i64> {
        let ticket = Ticket::new(self.next_id().await?, chat_id, description);
        self.collection.insert_one(&ticket).await?;

        debug!("Added ticket {} for chat {}", ticket.ticket_id, chat_id);
        Ok(ticket.ticket_id)
    }

    async fn remove(&self, chat_id: i64, ticket_id: i64) -> Result<bool> {
        let result = self
            .collection
            .delete_one(doc! { "chat_id": chat_id, "ticket_id": ticket_id })
            .await?;

        Ok(result.deleted_count > 0)
    }

    async fn list(&self, chat_id: i64) -> Result<Vec<Ticket>> {
        let options = FindOptions::builder().sort(doc! { "ticket_id": 1 }).build();

        let mut cursor = self
            .collection
            .find(doc! { "chat_id": chat_id })
            .with_options(options)
            .await?;

        let mut tickets = Vec::new();
        while let Some(result) = cursor.next().await {
            tickets.push(result?);
        }

        Ok(tickets)
    }
}
