use super::header::{Header, HeaderInternal};
use super::question::Question;
use super::resource::Resource;
use shared::error::Result;

// Parser is a cursor over a wire-format DNS message.
//
// Sections must be consumed in wire order: questions, answers,
// authorities, additionals.
pub(crate) struct Parser<'a> {
    msg: &'a [u8],
    off: usize,
    questions: u16,
    answers: u16,
    authorities: u16,
    additionals: u16,
}

impl<'a> Parser<'a> {
    // start parses the message header and positions the cursor at the
    // question section.
    pub(crate) fn start(msg: &'a [u8]) -> Result<(Parser<'a>, Header)> {
        let mut hi = HeaderInternal::default();
        let off = hi.unpack(msg, 0)?;
        let header = hi.header();
        Ok((
            Parser {
                msg,
                off,
                questions: hi.questions,
                answers: hi.answers,
                authorities: hi.authorities,
                additionals: hi.additionals,
            },
            header,
        ))
    }

    pub(crate) fn all_questions(&mut self) -> Result<Vec<Question>> {
        let mut questions = Vec::with_capacity(self.questions as usize);
        while self.questions > 0 {
            let (q, off) = Question::unpack(self.msg, self.off)?;
            self.off = off;
            self.questions -= 1;
            questions.push(q);
        }
        Ok(questions)
    }

    fn all_resources(&mut self, count: u16) -> Result<Vec<Resource>> {
        let mut resources = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (r, off) = Resource::unpack(self.msg, self.off)?;
            self.off = off;
            resources.push(r);
        }
        Ok(resources)
    }

    pub(crate) fn all_answers(&mut self) -> Result<Vec<Resource>> {
        let count = self.answers;
        self.answers = 0;
        self.all_resources(count)
    }

    pub(crate) fn all_authorities(&mut self) -> Result<Vec<Resource>> {
        let count = self.authorities;
        self.authorities = 0;
        self.all_resources(count)
    }

    pub(crate) fn all_additionals(&mut self) -> Result<Vec<Resource>> {
        let count = self.additionals;
        self.additionals = 0;
        self.all_resources(count)
    }
}
