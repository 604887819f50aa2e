use serde::{Deserialize, Serialize};

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// 发送给模型的一条消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }
}

/// 拆分为 (preamble, prompt)，同一角色的多条消息以空行拼接
pub fn split_messages(messages: &[ChatMessage]) -> (String, String) {
    let join = |role: Role| {
        messages
            .iter()
            .filter(|m| m.role == role)
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    };
    (join(Role::System), join(Role::User))
}
