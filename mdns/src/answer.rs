//! The question-answering contract between the responder and whatever
//! publishes records through it.

use std::sync::Arc;

use crate::message::{Message, Question as DnsQuestion, Resource};
use crate::response::set_unique_record;
use shared::error::Result;

/// Answerer provides answers to DNS questions.
///
/// Implementations must allow concurrent calls; the responder only hands
/// out shared references.
pub trait Answerer: Send + Sync {
    /// Populates an answer to a single DNS question.
    fn answer(&self, question: &Question<'_>, answer: &mut Answer) -> Result<()>;
}

/// A DNS question together with the request it arrived in.
pub struct Question<'a> {
    /// The decoded question, with the unicast-response bit already
    /// extracted and cleared.
    pub question: &'a DnsQuestion,

    /// The query message the question was carried in.
    pub query: &'a Message,

    /// OS index of the interface the query arrived on.
    pub interface_index: u32,
}

/// An answer to a DNS question.
#[derive(Default)]
pub struct Answer {
    /// Records that belong to "unique" record sets.
    ///
    /// A unique resource record set is one where all the records with
    /// that name, rrtype, and rrclass are conceptually under the control
    /// or ownership of a single responder (RFC 6762 section 2). These
    /// records are sent with the cache-flush bit set, except in legacy
    /// unicast responses.
    pub unique: ResponseSections,

    /// Records that belong to "shared" record sets.
    ///
    /// A shared resource record set is one where several Multicast DNS
    /// responders may have records with the same name, rrtype, and
    /// rrclass, and several responders may respond to a particular query
    /// (RFC 6762 section 2).
    pub shared: ResponseSections,
}

impl Answer {
    /// Returns true if the answer carries no records at all.
    pub fn is_empty(&self) -> bool {
        self.unique.is_empty() && self.shared.is_empty()
    }

    // append_to_message moves the answer's records into m.
    //
    // Unique records are rewritten with the cache-flush bit unless the
    // message targets a legacy querier.
    pub(crate) fn append_to_message(self, m: &mut Message, legacy: bool) {
        let mut unique = self.unique;
        if !legacy {
            for r in unique
                .answers
                .iter_mut()
                .chain(unique.authorities.iter_mut())
                .chain(unique.additionals.iter_mut())
            {
                set_unique_record(r);
            }
        }

        m.answers.extend(unique.answers);
        m.authorities.extend(unique.authorities);
        m.additionals.extend(unique.additionals);

        m.answers.extend(self.shared.answers);
        m.authorities.extend(self.shared.authorities);
        m.additionals.extend(self.shared.additionals);
    }
}

/// The three record sections of a response under construction.
#[derive(Default)]
pub struct ResponseSections {
    pub answers: Vec<Resource>,
    pub authorities: Vec<Resource>,
    pub additionals: Vec<Resource>,
}

impl ResponseSections {
    /// Returns true if no records have been appended.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.authorities.is_empty() && self.additionals.is_empty()
    }

    /// Appends a record to the answer section.
    pub fn answer(&mut self, record: Resource) {
        self.answers.push(record);
    }

    /// Appends a record to the authority section.
    pub fn authority(&mut self, record: Resource) {
        self.authorities.push(record);
    }

    /// Appends a record to the additional section.
    pub fn additional(&mut self, record: Resource) {
        self.additionals.push(record);
    }
}

/// An answerer that combines the answers of several answerers.
pub struct UnionAnswerer(pub Vec<Arc<dyn Answerer>>);

impl Answerer for UnionAnswerer {
    fn answer(&self, question: &Question<'_>, answer: &mut Answer) -> Result<()> {
        for a in &self.0 {
            a.answer(question, answer)?;
        }
        Ok(())
    }
}
