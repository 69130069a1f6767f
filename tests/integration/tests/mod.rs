mod create;
mod find;
mod update;
mod setup;
