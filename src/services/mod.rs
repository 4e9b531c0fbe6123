pub mod confirmation;
pub mod emails;
pub mod invites;
pub mod links;
pub mod mail;
pub mod store;
pub mod trips;

use std::sync::Arc;

use self::{emails::EmailComposer, links::Links, mail::Mailer, store::TripStore};

/// The collaborators every trip service is built from.
#[derive(Clone)]
pub struct ServiceContext {
    pub store: Arc<dyn TripStore>,
    pub mailer: Arc<dyn Mailer>,
    pub composer: EmailComposer,
    pub links: Links,
}

impl ServiceContext {
    pub fn new(
        store: Arc<dyn TripStore>,
        mailer: Arc<dyn Mailer>,
        composer: EmailComposer,
        links: Links,
    ) -> Self {
        Self {
            store,
            mailer,
            composer,
            links,
        }
    }
}
