//! 日志切面
//!
//! 每条规则只做一件事：记录自己被触发了。注册顺序决定同一时机下的触发顺序。

use crate::aop::{
    Advice, AdviceKind, AdviceRegistry, AdviceRule, ExecutionPattern, JoinPoint, Journal, Pointcut,
};
use tracing::info;

use super::pointcuts::{
    annotated_with, application_methods, log_annotated_methods, CUSTOM_ANNOTATION,
    SECOND_CUSTOM_ANNOTATION,
};
use super::service::SERVICE_SCOPE;

pub const THIS_METHOD_WILL_NOT_BE_CALLED: &str = "this_method_will_not_be_called";
pub const BEFORE: &str = "before";
pub const AFTER: &str = "after";
pub const AROUND: &str = "around";
pub const AFTER_RETURNING: &str = "after_returning";
pub const AFTER_THROWING: &str = "after_throwing";
pub const LOG_THE_INFO_1: &str = "log_the_info_1";
pub const LOG_THE_INFO_2: &str = "log_the_info_2";
pub const LOG_THE_INFO_3: &str = "log_the_info_3";
pub const ANNOTATED_METHOD_1: &str = "log_info_from_annotated_method_1";
pub const ANNOTATED_METHOD_2: &str = "log_info_from_annotated_method_2";
pub const ANNOTATED_METHOD_3: &str = "log_info_from_annotated_method_3";
pub const ANNOTATED_METHOD_4: &str = "log_info_from_annotated_method_4";

#[derive(Debug, Clone, Default)]
pub struct LoggingAspect {
    journal: Journal,
}

impl LoggingAspect {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// 只记录日志的 before 规则
    fn logging_before(
        &self,
        name: &'static str,
        pointcut: impl Into<Pointcut>,
        message: &'static str,
    ) -> AdviceRule {
        let journal = self.journal.clone();
        AdviceRule::new(
            name,
            pointcut,
            Advice::before(move |jp: &JoinPoint<'_>| {
                info!("{} - {}", message, jp.signature());
                journal.record_advice(name, AdviceKind::Before, jp, None);
                Ok(())
            }),
        )
    }

    /// 按固定顺序注册全部规则
    pub fn register(&self, registry: &mut AdviceRegistry) {
        let journal = self.journal.clone();
        registry.register(AdviceRule::new(
            THIS_METHOD_WILL_NOT_BE_CALLED,
            ExecutionPattern::named("method_that_is_not_advised_if_called_from_within_the_service")
                .no_params(),
            Advice::before(move |jp| {
                info!("This line is logged only when the method is called from outside the service");
                journal.record_advice(THIS_METHOD_WILL_NOT_BE_CALLED, AdviceKind::Before, jp, None);
                Ok(())
            }),
        ));

        registry.register(self.logging_before(
            BEFORE,
            ExecutionPattern::named("do_something").params(["&str"]),
            "Aspect before",
        ));

        let journal = self.journal.clone();
        registry.register(AdviceRule::new(
            AFTER,
            ExecutionPattern::named("do_something").params(["&str"]),
            Advice::after(move |jp| {
                info!("Aspect after {}", jp.signature());
                journal.record_advice(AFTER, AdviceKind::After, jp, None);
            }),
        ));

        let journal = self.journal.clone();
        registry.register(AdviceRule::new(
            AROUND,
            ExecutionPattern::named("do_something_else"),
            Advice::around(move |jp, proceed| {
                info!("Aspect entering around 1 {}", jp.signature());
                journal.record_advice(AROUND, AdviceKind::Around, jp, Some("enter".into()));
                let result = proceed.proceed();
                info!("Aspect exiting around 1 {}", jp.signature());
                journal.record_advice(AROUND, AdviceKind::Around, jp, Some("exit".into()));
                result
            }),
        ));

        let journal = self.journal.clone();
        registry.register(AdviceRule::new(
            AFTER_RETURNING,
            ExecutionPattern::named("return_success").no_params(),
            Advice::after_success(move |jp, value| {
                info!("Aspect afterReturning caught String value from advised method: {}", value);
                info!("Aspect afterReturning {}", jp.signature());
                journal.record_advice(
                    AFTER_RETURNING,
                    AdviceKind::AfterSuccess,
                    jp,
                    Some(value.to_string()),
                );
            }),
        ));

        let journal = self.journal.clone();
        registry.register(AdviceRule::new(
            AFTER_THROWING,
            ExecutionPattern::named("throw_exception"),
            Advice::after_failure(move |jp, error| {
                info!("Aspect afterThrowing. Exception message is: {}", error.message());
                journal.record_advice(
                    AFTER_THROWING,
                    AdviceKind::AfterFailure,
                    jp,
                    Some(error.message().to_string()),
                );
            }),
        ));

        registry.register(self.logging_before(
            LOG_THE_INFO_1,
            ExecutionPattern::any().within(SERVICE_SCOPE),
            "Logging the info 1",
        ));
        registry.register(self.logging_before(
            LOG_THE_INFO_2,
            ExecutionPattern::any().within("aop_showcase::..::*SimpleService"),
            "Logging the info 2",
        ));
        registry.register(self.logging_before(
            LOG_THE_INFO_3,
            application_methods(),
            "Logging the info 3",
        ));

        registry.register(self.logging_before(
            ANNOTATED_METHOD_1,
            annotated_with(CUSTOM_ANNOTATION),
            "Aspect for annotated method",
        ));
        registry.register(self.logging_before(
            ANNOTATED_METHOD_2,
            log_annotated_methods(),
            "Logging for annotated method using the shared pointcuts",
        ));
        registry.register(self.logging_before(
            ANNOTATED_METHOD_3,
            annotated_with(CUSTOM_ANNOTATION) | annotated_with(SECOND_CUSTOM_ANNOTATION),
            "Aspect for annotated method (either marker)",
        ));
        registry.register(self.logging_before(
            ANNOTATED_METHOD_4,
            annotated_with(CUSTOM_ANNOTATION) & annotated_with(SECOND_CUSTOM_ANNOTATION),
            "Aspect for annotated method (both markers)",
        ));
    }

    /// 创建注册好全部规则的注册表
    pub fn registry(&self) -> AdviceRegistry {
        let mut registry = AdviceRegistry::new();
        self.register(&mut registry);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::simple::service::SimpleOperation;

    #[test]
    fn test_rule_count_and_order() {
        let registry = LoggingAspect::default().registry();
        let names: Vec<_> = registry.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                THIS_METHOD_WILL_NOT_BE_CALLED,
                BEFORE,
                AFTER,
                AROUND,
                AFTER_RETURNING,
                AFTER_THROWING,
                LOG_THE_INFO_1,
                LOG_THE_INFO_2,
                LOG_THE_INFO_3,
                ANNOTATED_METHOD_1,
                ANNOTATED_METHOD_2,
                ANNOTATED_METHOD_3,
                ANNOTATED_METHOD_4,
            ]
        );
    }

    #[test]
    fn test_shared_pointcut_equals_inline_expression() {
        let registry = LoggingAspect::default().registry();
        let pointcut_of = |name: &str| {
            registry
                .iter()
                .find(|r| r.name() == name)
                .map(|r| r.pointcut().clone())
                .unwrap()
        };
        assert_eq!(pointcut_of(ANNOTATED_METHOD_1), pointcut_of(ANNOTATED_METHOD_2));
        assert_ne!(pointcut_of(ANNOTATED_METHOD_3), pointcut_of(ANNOTATED_METHOD_4));
    }

    #[test]
    fn test_aspect_records_into_its_journal() {
        let aspect = LoggingAspect::new(Journal::new(8));
        let registry = aspect.registry();
        let descriptor = SimpleOperation::DoSomething.descriptor();
        let args = ["Ann".to_string()];
        let join_point = JoinPoint::new(&descriptor, &args);

        let before = registry.rules_for(&descriptor, AdviceKind::Before);
        for rule in &before {
            if let Advice::Before(handler) = rule.advice() {
                handler(&join_point).unwrap();
            }
        }

        let journal = aspect.journal();
        assert_eq!(journal.capacity(), 8);
        assert_eq!(journal.len(), before.len());
        assert_eq!(journal.fired(BEFORE), 1);
        assert_eq!(journal.fired(LOG_THE_INFO_3), 1);
        assert!(journal
            .entries()
            .iter()
            .all(|e| e.call_id == Some(join_point.call_id)));
    }
}
