use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::AppError,
    services::{
        confirmation::ConfirmationService,
        emails::EmailComposer,
        invites::InviteService,
        links::Links,
        mail::{Mailbox, Mailer},
        store::TripStore,
        trips::TripService,
        ServiceContext,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub links: Links,
    pub trips: TripService,
    pub invites: InviteService,
    pub confirmations: ConfirmationService,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn TripStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, AppError> {
        let links = Links::new(config.api_base_url.clone(), config.web_base_url.clone())?;
        let composer = EmailComposer::new(Mailbox::new(
            Some(config.mail_from_name.clone()),
            config.mail_from_address.clone(),
        ));
        let ctx = ServiceContext::new(store, mailer, composer, links.clone());

        Ok(Self {
            trips: TripService::new(ctx.clone()),
            invites: InviteService::new(ctx.clone()),
            confirmations: ConfirmationService::new(ctx, config.notify_policy),
            links,
        })
    }
}
