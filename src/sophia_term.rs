//! I define [`OxTerm`], an implementation of [`sophia::api::term::Term`] over borrowed oxrdf terms.
//! *This module is available only if rdfio is built with the `"sophia"` feature.*
use oxrdf::TermRef;
use sophia::api::MownStr;
use sophia::api::term::{BnodeId, IriRef, LanguageTag, Term, TermKind};

/// Borrowed oxrdf term seen through the Sophia term API.
#[derive(Clone, Copy, Debug)]
pub struct OxTerm<'a>(pub TermRef<'a>);

impl Term for OxTerm<'_> {
    type BorrowTerm<'x>
        = &'x Self
    where
        Self: 'x;

    #[allow(unreachable_patterns)]
    fn kind(&self) -> TermKind {
        match self.0 {
            TermRef::NamedNode(_) => TermKind::Iri,
            TermRef::BlankNode(_) => TermKind::BlankNode,
            TermRef::Literal(_) => TermKind::Literal,
            _ => TermKind::Triple,
        }
    }

    fn borrow_term(&self) -> Self::BorrowTerm<'_> {
        self
    }

    fn iri(&self) -> Option<IriRef<MownStr<'_>>> {
        match self.0 {
            TermRef::NamedNode(n) => Some(IriRef::new_unchecked(MownStr::from_ref(n.as_str()))),
            _ => None,
        }
    }

    fn bnode_id(&self) -> Option<BnodeId<MownStr<'_>>> {
        match self.0 {
            TermRef::BlankNode(b) => Some(BnodeId::new_unchecked(MownStr::from_ref(b.as_str()))),
            _ => None,
        }
    }

    fn lexical_form(&self) -> Option<MownStr<'_>> {
        match self.0 {
            TermRef::Literal(l) => Some(MownStr::from_ref(l.value())),
            _ => None,
        }
    }

    // language strings report rdf:langString
    fn datatype(&self) -> Option<IriRef<MownStr<'_>>> {
        match self.0 {
            TermRef::Literal(l) => Some(IriRef::new_unchecked(MownStr::from_ref(l.datatype().as_str()))),
            _ => None,
        }
    }

    fn language_tag(&self) -> Option<LanguageTag<MownStr<'_>>> {
        match self.0 {
            TermRef::Literal(l) => l.language().map(|tag| LanguageTag::new_unchecked(MownStr::from_ref(tag))),
            _ => None,
        }
    }
}
