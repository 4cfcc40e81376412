// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driving the scheduler with a hand-written manager.
//!
//! A tiny text pipeline: the raw text yields tokens, tokens yield a
//! lowercased copy and a vocabulary, and the vocabulary together with the
//! lowercased tokens yields word counts. The manager owns the payloads and
//! reports what it holds after every step.
//!
//! Run:
//! - `cargo run -p understory_demos --example custom_manager`

use std::collections::HashMap;
use std::convert::Infallible;

use understory_ds_graph::{CompressMode, Manager, Provider, ProviderRegistry, construct_all};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Stage {
    Tokens,
    Lower,
    Vocabulary,
    Counts,
}

const TEXT: &str = "the quick brown fox jumps over The lazy dog the end";

#[derive(Default)]
struct Pipeline {
    tokens: Option<Vec<String>>,
    lower: Option<Vec<String>>,
    vocabulary: Option<Vec<String>>,
    counts: Option<HashMap<String, usize>>,
}

impl Pipeline {
    fn held(&self) -> Vec<&'static str> {
        let mut held = Vec::new();
        if self.tokens.is_some() {
            held.push("tokens");
        }
        if self.lower.is_some() {
            held.push("lower");
        }
        if self.vocabulary.is_some() {
            held.push("vocabulary");
        }
        if self.counts.is_some() {
            held.push("counts");
        }
        held
    }
}

impl Manager<Stage> for Pipeline {
    type Error = Infallible;

    fn ensure_provider(&mut self, _kind: Stage) -> Result<(), Infallible> {
        Ok(())
    }

    fn construct(&mut self, kind: Stage, _compressed: bool) -> Result<(), Infallible> {
        match kind {
            Stage::Tokens => {
                self.tokens = Some(TEXT.split_whitespace().map(String::from).collect());
            }
            Stage::Lower => {
                let tokens = self.tokens.as_deref().unwrap_or_default();
                self.lower = Some(tokens.iter().map(|t| t.to_lowercase()).collect());
            }
            Stage::Vocabulary => {
                let mut words = self.lower.clone().unwrap_or_default();
                words.sort();
                words.dedup();
                self.vocabulary = Some(words);
            }
            Stage::Counts => {
                let mut counts: HashMap<String, usize> = self
                    .vocabulary
                    .iter()
                    .flatten()
                    .map(|w| (w.clone(), 0))
                    .collect();
                for word in self.lower.iter().flatten() {
                    *counts.entry(word.clone()).or_default() += 1;
                }
                self.counts = Some(counts);
            }
        }
        println!("construct {kind:?} holding {:?}", self.held());
        Ok(())
    }

    fn discard(&mut self, kind: Stage, intermediate: bool) {
        match kind {
            Stage::Tokens => self.tokens = None,
            Stage::Lower => self.lower = None,
            Stage::Vocabulary => self.vocabulary = None,
            Stage::Counts => self.counts = None,
        }
        println!("discard   {kind:?} intermediate={intermediate}");
    }

    fn protect(&mut self, kind: Stage) {
        println!("protect   {kind:?}");
    }

    fn unprotect(&mut self, kind: Stage) {
        println!("unprotect {kind:?}");
    }

    fn compress(&mut self, _kind: Stage) -> Result<(), Infallible> {
        Ok(())
    }
}

fn main() {
    let mut registry = ProviderRegistry::new();
    registry.register(Stage::Tokens, Provider::new());
    registry.register(Stage::Lower, Provider::new().requires([Stage::Tokens]));
    registry.register(Stage::Vocabulary, Provider::new().requires([Stage::Lower]));
    registry.register(
        Stage::Counts,
        Provider::new().requires([Stage::Vocabulary, Stage::Lower]),
    );

    let mut pipeline = Pipeline::default();
    let schedule = match construct_all(
        &registry,
        &mut pipeline,
        &[Stage::Counts],
        CompressMode::Plain,
    ) {
        Ok(schedule) => schedule,
        Err(err) => {
            eprintln!("scheduling failed: {err}");
            return;
        }
    };

    println!("order: {:?}", schedule.constructed());
    let mut counts: Vec<_> = pipeline.counts.unwrap_or_default().into_iter().collect();
    counts.sort();
    println!("counts: {counts:?}");
}
