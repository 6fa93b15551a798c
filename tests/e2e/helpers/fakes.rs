use academy_backend::infrastructure::gateways::{
    AiGateway, Completion, CompletionRequest, EmailGateway, OutgoingEmail,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

/// Scriptable AI provider that records how often it was called
pub struct FakeAiGateway {
    calls: AtomicUsize,
    tokens: AtomicU32,
    failing: AtomicBool,
    reply: Mutex<String>,
}

impl Default for FakeAiGateway {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            tokens: AtomicU32::new(300),
            failing: AtomicBool::new(false),
            reply: Mutex::new("Generated lesson text".to_string()),
        }
    }
}

#[allow(dead_code)]
impl FakeAiGateway {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_tokens(&self, tokens: u32) {
        self.tokens.store(tokens, Ordering::SeqCst);
    }

    pub fn set_reply(&self, reply: &str) {
        *self.reply.lock() = reply.to_string();
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AiGateway for FakeAiGateway {
    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err("provider overloaded".to_string());
        }
        Ok(Completion {
            text: self.reply.lock().clone(),
            total_tokens: self.tokens.load(Ordering::SeqCst),
        })
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err("provider overloaded".to_string());
        }
        Ok("https://images.academy.test/generated.png".to_string())
    }
}

/// Email provider that keeps sent messages in memory
#[derive(Default)]
pub struct FakeEmailGateway {
    sent: Mutex<Vec<OutgoingEmail>>,
}

#[allow(dead_code)]
impl FakeEmailGateway {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl EmailGateway for FakeEmailGateway {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, String> {
        let mut sent = self.sent.lock();
        sent.push(email.clone());
        Ok(format!("email_{}", sent.len()))
    }
}
