use crate::workspace::csharp::{DocumentIndex, TypeDeclKind};

/// Outcome of matching a usage document against a candidate's designated
/// handler. The check is syntactic: the single "Handler"-suffixed class must
/// mention the candidate's simple name among its base-list identifier tokens.
/// An unrelated base type sharing that simple name matches too; that
/// approximation is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerMatch {
    Matched,
    NotMatched,
    /// More than one "Handler"-suffixed class in the document; the usage
    /// cannot be attributed to a single handler.
    Ambiguous { handlers: usize },
}

pub fn match_usage(index: &DocumentIndex, candidate_name: &str) -> HandlerMatch {
    let handlers: Vec<_> = index
        .types
        .iter()
        .filter(|decl| decl.kind == TypeDeclKind::Class && decl.name.ends_with("Handler"))
        .collect();
    match handlers.as_slice() {
        [] => HandlerMatch::NotMatched,
        [handler] => {
            if handler.base_idents.iter().any(|base| base == candidate_name) {
                HandlerMatch::Matched
            } else {
                HandlerMatch::NotMatched
            }
        }
        _ => HandlerMatch::Ambiguous {
            handlers: handlers.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{HandlerMatch, match_usage};
    use crate::workspace::csharp::CSharpIndexer;

    fn index_of(source: &str) -> crate::workspace::csharp::DocumentIndex {
        CSharpIndexer::new().unwrap().index(source).unwrap()
    }

    #[test]
    fn matches_handler_with_candidate_in_base_list() {
        let index = index_of(
            r#"
namespace Billing.Application {
    public class ChargeCommandHandler : IRequestHandler<ChargeCommand> {
        public Task Handle(ChargeCommand request) { return Task.CompletedTask; }
    }
}
"#,
        );
        assert_eq!(match_usage(&index, "ChargeCommand"), HandlerMatch::Matched);
    }

    #[test]
    fn matching_is_syntactic_on_base_list_tokens() {
        let index = index_of(
            r#"
public class ChargeCommandHandler : IRequestHandler<OtherCommand> {
    public Task Handle(ChargeCommand request) { return Task.CompletedTask; }
}
"#,
        );
        // the handler consumes ChargeCommand in its signature, but the base
        // list names OtherCommand, so it is not ChargeCommand's handler
        assert_eq!(match_usage(&index, "ChargeCommand"), HandlerMatch::NotMatched);
        assert_eq!(match_usage(&index, "OtherCommand"), HandlerMatch::Matched);
    }

    #[test]
    fn document_without_handler_class_never_matches() {
        let index = index_of(
            r#"
public class ChargeService {
    public void Run() { var command = new ChargeCommand(); }
}
"#,
        );
        assert_eq!(match_usage(&index, "ChargeCommand"), HandlerMatch::NotMatched);
    }

    #[test]
    fn multiple_handler_classes_are_ambiguous() {
        let index = index_of(
            r#"
public class ChargeCommandHandler : IRequestHandler<ChargeCommand> {}
public class RefundCommandHandler : IRequestHandler<RefundCommand> {}
"#,
        );
        assert_eq!(
            match_usage(&index, "ChargeCommand"),
            HandlerMatch::Ambiguous { handlers: 2 }
        );
    }

    #[test]
    fn handler_suffix_applies_to_classes_only() {
        let index = index_of("public interface INotificationHandler {}");
        assert_eq!(match_usage(&index, "ChargeCommand"), HandlerMatch::NotMatched);
    }
}
