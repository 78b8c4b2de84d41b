//! invoker-core
//!
//! Deployment pipeline の invoker 層。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（operation, task payload, deployment details, envelope, relocation, errors）
//! - **ports**: 抽象化レイヤー（LocalHandler, RemoteInvoker, ObjectStore, Clock, など）
//! - **app**: アプリケーションロジック（dispatcher, resolver, registry, relocator）
//! - **impls**: 実装（HttpInvoker, in-memory bucket, filesystem object store）
//! - **config**: 起動時に 1 回だけ読む設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
