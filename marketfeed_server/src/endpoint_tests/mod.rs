mod helpers;

mod api;
mod feeds;
mod webhooks;
