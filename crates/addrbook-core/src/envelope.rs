//! The address fields of a message.

use addrbook_address::AddressList;

/// Address headers of one message.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    /// `From:`
    pub from: AddressList,
    /// `To:`
    pub to: AddressList,
    /// `Cc:`
    pub cc: AddressList,
    /// `Bcc:`
    pub bcc: AddressList,
    /// `Reply-To:`
    pub reply_to: AddressList,
    /// `Mail-Followup-To:`
    pub mail_followup_to: AddressList,
}

impl Envelope {
    /// Creates an envelope with empty fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every address field, in header order.
    pub fn fields_mut(&mut self) -> [&mut AddressList; 6] {
        [
            &mut self.from,
            &mut self.to,
            &mut self.cc,
            &mut self.bcc,
            &mut self.reply_to,
            &mut self.mail_followup_to,
        ]
    }

    /// Returns the number of recipients across `to`, `cc` and `bcc`.
    #[must_use]
    pub fn count_recips(&self) -> usize {
        self.to.count_recips() + self.cc.count_recips() + self.bcc.count_recips()
    }
}
