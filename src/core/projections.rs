//! Read-only reporting shapes produced by the export pipeline.

use crate::domain::Cents;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrisonerCellView {
    pub id: i32,
    pub name: String,
    pub cell_number: Option<i32>,
    pub officers: Vec<OfficerView>,
    pub total_officer_salary: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfficerView {
    pub officer_name: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrisonerInboxView {
    pub id: i32,
    pub name: String,
    pub incarceration_date: String,
    pub encrypted_messages: EncryptedMessages,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EncryptedMessages {
    #[serde(rename = "Message")]
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageView {
    pub description: String,
}
