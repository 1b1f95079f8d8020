pub mod command;
pub mod config;
pub mod diragg;
pub mod dirlist;
pub mod dispatcher;
pub mod history;
pub mod launch;
pub mod logging;
pub mod mathproc;
pub mod opener;
pub mod processor;
pub mod quickcmd;
pub mod quickwin;
pub mod runtime;
pub mod strcompare;
pub mod window;
