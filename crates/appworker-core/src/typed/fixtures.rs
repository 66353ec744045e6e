//! テスト用の capability 定義

use async_trait::async_trait;
use serde::Deserialize;

use super::args::ActionArgs;
use super::handler::Handler;

#[derive(Debug, Deserialize)]
pub struct Echo {
    pub text: String,
}

impl ActionArgs for Echo {
    const ACTION_NAME: &'static str = "echo";
    const PARAM_NAMES: &'static [&'static str] = &["text"];
}

pub struct EchoHandler;

#[async_trait]
impl Handler<Echo> for EchoHandler {
    type Output = String;

    async fn handle(&self, args: Echo) -> anyhow::Result<String> {
        Ok(args.text)
    }
}

#[derive(Debug, Deserialize)]
pub struct Ping {}

impl ActionArgs for Ping {
    const ACTION_NAME: &'static str = "ping";
    const PARAM_NAMES: &'static [&'static str] = &[];
}

pub struct PingHandler;

#[async_trait]
impl Handler<Ping> for PingHandler {
    type Output = &'static str;

    async fn handle(&self, _args: Ping) -> anyhow::Result<&'static str> {
        Ok("pong")
    }
}

#[derive(Debug, Deserialize)]
pub struct Add {
    pub x: i64,
    pub y: i64,
}

impl ActionArgs for Add {
    const ACTION_NAME: &'static str = "add";
    const PARAM_NAMES: &'static [&'static str] = &["x", "y"];
}

pub struct AddHandler;

#[async_trait]
impl Handler<Add> for AddHandler {
    type Output = i64;

    async fn handle(&self, args: Add) -> anyhow::Result<i64> {
        Ok(args.x + args.y)
    }
}

#[derive(Debug, Deserialize)]
pub struct Explode {
    pub reason: String,
}

impl ActionArgs for Explode {
    const ACTION_NAME: &'static str = "explode";
    const PARAM_NAMES: &'static [&'static str] = &["reason"];
}

pub struct ExplodeHandler;

#[async_trait]
impl Handler<Explode> for ExplodeHandler {
    type Output = ();

    async fn handle(&self, args: Explode) -> anyhow::Result<()> {
        anyhow::bail!(args.reason)
    }
}

#[derive(Debug, Deserialize)]
pub struct Panic {}

impl ActionArgs for Panic {
    const ACTION_NAME: &'static str = "panic";
    const PARAM_NAMES: &'static [&'static str] = &[];
}

pub struct PanicHandler;

#[async_trait]
impl Handler<Panic> for PanicHandler {
    type Output = ();

    async fn handle(&self, _args: Panic) -> anyhow::Result<()> {
        panic!("handler blew up")
    }
}
