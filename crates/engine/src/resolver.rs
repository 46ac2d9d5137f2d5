// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability-aware resolver: filters a provider snapshot by
//! capability and context length, applies a named selection policy, and
//! returns a concrete client bound to one `(provider, backendURL)` pair.

use llmfabric_adapters::{
    HttpProviderClient, LLMChatClient, LLMEmbedClient, LLMPromptExecClient, LLMStreamClient, Provider,
};
use llmfabric_core::{model_names_match, BackendType, RejectedCandidate, ResolverError};

/// Named selection policies. `low-prio` is reserved and
/// deliberately absent from this enum; any name that does not parse
/// becomes `ResolverError::UnknownPolicy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Uniform random provider among candidates, uniform random backend
    /// URL within it.
    Random,
    /// Highest context length wins; ties broken by earliest encountered.
    /// Backend URL chosen uniformly at random. Aliased as `low-latency`.
    Auto,
}

impl SelectionPolicy {
    pub fn parse(name: &str) -> Result<Self, ResolverError> {
        match name {
            "random" => Ok(SelectionPolicy::Random),
            "auto" | "low-latency" => Ok(SelectionPolicy::Auto),
            other => Err(ResolverError::UnknownPolicy(other.to_string())),
        }
    }
}

/// A resolve request, shared by all four capability entry points.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Defaults to `[ollama, vllm]` when empty.
    pub provider_types: Vec<BackendType>,
    /// Preference list in priority order; empty means "any".
    pub model_names: Vec<String>,
    pub context_length: i64,
}

impl ResolveRequest {
    pub fn effective_provider_types(&self) -> Vec<BackendType> {
        if self.provider_types.is_empty() {
            vec![BackendType::Ollama, BackendType::Vllm]
        } else {
            self.provider_types.clone()
        }
    }
}

type Predicate = fn(&Provider) -> bool;

/// The resolver itself carries no state beyond the HTTP client used to
/// build the capability-typed clients it returns; the provider snapshot
/// is supplied by the caller on every call.
pub struct Resolver {
    http: reqwest::Client,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self { http: llmfabric_adapters::new_http_client(llmfabric_adapters::client::LIST_TIMEOUT) }
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    pub fn chat(
        &self,
        request: &ResolveRequest,
        providers: &[Provider],
        policy: &str,
    ) -> Result<(Box<dyn LLMChatClient>, String), ResolverError> {
        let (provider, base_url) = self.select(request, providers, policy, |p| p.can_chat())?;
        Ok((Box::new(HttpProviderClient::new(self.http.clone(), provider.handle_at(base_url))), provider.model_name))
    }

    pub fn embed(
        &self,
        request: &ResolveRequest,
        providers: &[Provider],
        policy: &str,
    ) -> Result<(Box<dyn LLMEmbedClient>, String), ResolverError> {
        let (provider, base_url) = self.select(request, providers, policy, |p| p.can_embed())?;
        Ok((Box::new(HttpProviderClient::new(self.http.clone(), provider.handle_at(base_url))), provider.model_name))
    }

    pub fn prompt(
        &self,
        request: &ResolveRequest,
        providers: &[Provider],
        policy: &str,
    ) -> Result<(Box<dyn LLMPromptExecClient>, String), ResolverError> {
        let (provider, base_url) = self.select(request, providers, policy, |p| p.can_prompt())?;
        Ok((Box::new(HttpProviderClient::new(self.http.clone(), provider.handle_at(base_url))), provider.model_name))
    }

    pub fn stream(
        &self,
        request: &ResolveRequest,
        providers: &[Provider],
        policy: &str,
    ) -> Result<(Box<dyn LLMStreamClient>, String), ResolverError> {
        let (provider, base_url) = self.select(request, providers, policy, |p| p.can_stream())?;
        Ok((Box::new(HttpProviderClient::new(self.http.clone(), provider.handle_at(base_url))), provider.model_name))
    }

    fn select(
        &self,
        request: &ResolveRequest,
        providers: &[Provider],
        policy: &str,
        capability_ok: Predicate,
    ) -> Result<(Provider, String), ResolverError> {
        // Edge case: zero/negative context length must fail fast,
        // before the policy name is even looked at.
        if request.context_length <= 0 {
            return Err(ResolverError::InvalidRequest("context_length must be positive".into()));
        }
        let policy = SelectionPolicy::parse(policy)?;

        let wanted_types = request.effective_provider_types();
        let in_scope: Vec<&Provider> = providers.iter().filter(|p| wanted_types.contains(&p.backend_type)).collect();

        if in_scope.is_empty() {
            return Err(ResolverError::NoAvailableModels(wanted_types.iter().map(|t| t.as_str().to_string()).collect()));
        }

        let candidates = filter_candidates(&in_scope, request, capability_ok);
        if candidates.is_empty() {
            let rejected = in_scope.iter().map(|p| reject(p, request, capability_ok)).collect();
            return Err(ResolverError::NoSatisfactoryModel {
                diagnostic: format!("no provider satisfied capability/context/name constraints among {} candidates", in_scope.len()),
                rejected,
            });
        }

        let chosen = apply_policy(policy, &candidates);
        let base_url = pick_base_url(chosen);
        Ok(((*chosen).clone(), base_url))
    }
}

fn filter_candidates<'a>(
    in_scope: &[&'a Provider],
    request: &ResolveRequest,
    capability_ok: Predicate,
) -> Vec<&'a Provider> {
    let ctx = request.context_length as u32;

    if request.model_names.is_empty() {
        return in_scope.iter().copied().filter(|p| capability_ok(p) && p.context_length() >= ctx).collect();
    }

    let mut admitted = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();
    for preferred in &request.model_names {
        for provider in in_scope {
            if seen_ids.contains(provider.id()) {
                continue;
            }
            if !model_names_match(provider.model_name(), preferred) {
                continue;
            }
            if !capability_ok(provider) || provider.context_length() < ctx {
                continue;
            }
            seen_ids.insert(provider.id().to_string());
            admitted.push(*provider);
        }
    }
    admitted
}

fn reject(provider: &Provider, request: &ResolveRequest, capability_ok: Predicate) -> RejectedCandidate {
    let ctx = request.context_length as u32;
    let reason = if !capability_ok(provider) {
        "missing required capability".to_string()
    } else if provider.context_length() < ctx {
        format!("context length {} below required {}", provider.context_length(), ctx)
    } else if !request.model_names.is_empty()
        && !request.model_names.iter().any(|n| model_names_match(provider.model_name(), n))
    {
        "model name did not match preference list".to_string()
    } else {
        "excluded".to_string()
    };

    RejectedCandidate {
        provider_id: provider.id().to_string(),
        model_name: provider.model_name().to_string(),
        context_length: provider.context_length(),
        can_chat: provider.can_chat(),
        can_embed: provider.can_embed(),
        can_prompt: provider.can_prompt(),
        can_stream: provider.can_stream(),
        reason,
    }
}

fn apply_policy<'a>(policy: SelectionPolicy, candidates: &[&'a Provider]) -> &'a Provider {
    match policy {
        SelectionPolicy::Random => candidates[fastrand::usize(..candidates.len())],
        SelectionPolicy::Auto => {
            let mut best = candidates[0];
            for candidate in &candidates[1..] {
                if candidate.context_length() > best.context_length() {
                    best = candidate;
                }
            }
            best
        }
    }
}

fn pick_base_url(provider: &Provider) -> String {
    if provider.base_urls.len() == 1 {
        return provider.base_urls[0].clone();
    }
    provider.base_urls[fastrand::usize(..provider.base_urls.len())].clone()
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
