pub mod test_inbound_messages;
pub mod test_send_gating;
