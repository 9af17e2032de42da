//! 演示用业务服务
//!
//! `SimpleService` 是真实目标；控制器拿到的是包着它的 `Proxy<SimpleService>`。
//! 两者都实现 [`SimpleApi`]，但只有代理会触发通知。

use crate::aop::{Advised, Journal, OperationDescriptor, Outcome, Proxy};
use crate::core::error::ServiceError;
use tracing::info;

use super::pointcuts::{CUSTOM_ANNOTATION, SECOND_CUSTOM_ANNOTATION};

/// `SimpleService` 的声明作用域，即类型的完整路径
pub const SERVICE_SCOPE: &str = "aop_showcase::app::simple::service::SimpleService";

pub const NOT_ADVISED_MESSAGE: &str = "This method is not discovered by the LoggingAspect";
pub const DO_SOMETHING_MESSAGE: &str = "doSomething from the service";
pub const SUCCESS_MESSAGE: &str = "Success from the service";
pub const EXCEPTION_MESSAGE: &str = "This is the exception thrown from the service";
pub const ANNOTATED_MESSAGE: &str = "Method is annotated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleOperation {
    CallMethodThatIsNotAdvised,
    MethodThatIsNotAdvisedIfCalledFromWithinTheService,
    DoSomething,
    DoSomethingElse,
    ThrowException,
    ReturnSuccess,
    AnnotatedMethod,
    SecondAnnotatedMethod,
    ThirdAnnotatedMethod,
}

impl SimpleOperation {
    pub const ALL: [SimpleOperation; 9] = [
        SimpleOperation::CallMethodThatIsNotAdvised,
        SimpleOperation::MethodThatIsNotAdvisedIfCalledFromWithinTheService,
        SimpleOperation::DoSomething,
        SimpleOperation::DoSomethingElse,
        SimpleOperation::ThrowException,
        SimpleOperation::ReturnSuccess,
        SimpleOperation::AnnotatedMethod,
        SimpleOperation::SecondAnnotatedMethod,
        SimpleOperation::ThirdAnnotatedMethod,
    ];

    pub fn method_name(self) -> &'static str {
        match self {
            SimpleOperation::CallMethodThatIsNotAdvised => "call_method_that_is_not_advised",
            SimpleOperation::MethodThatIsNotAdvisedIfCalledFromWithinTheService => {
                "method_that_is_not_advised_if_called_from_within_the_service"
            }
            SimpleOperation::DoSomething => "do_something",
            SimpleOperation::DoSomethingElse => "do_something_else",
            SimpleOperation::ThrowException => "throw_exception",
            SimpleOperation::ReturnSuccess => "return_success",
            SimpleOperation::AnnotatedMethod => "annotated_method",
            SimpleOperation::SecondAnnotatedMethod => "second_annotated_method",
            SimpleOperation::ThirdAnnotatedMethod => "third_annotated_method",
        }
    }

    pub fn descriptor(self) -> OperationDescriptor {
        let d = OperationDescriptor::new(SERVICE_SCOPE, self.method_name());
        match self {
            SimpleOperation::DoSomething => d.param("&str"),
            SimpleOperation::AnnotatedMethod => d.marker(CUSTOM_ANNOTATION),
            SimpleOperation::SecondAnnotatedMethod => d.marker(SECOND_CUSTOM_ANNOTATION),
            SimpleOperation::ThirdAnnotatedMethod => {
                d.marker(CUSTOM_ANNOTATION).marker(SECOND_CUSTOM_ANNOTATION)
            }
            _ => d,
        }
    }
}

/// 服务对外暴露的操作
pub trait SimpleApi: Send + Sync {
    /// 在服务内部调用 `method_that_is_not_advised_if_called_from_within_the_service`
    fn call_method_that_is_not_advised(&self) -> Outcome;
    fn method_that_is_not_advised_if_called_from_within_the_service(&self) -> Outcome;
    fn do_something(&self, name: &str) -> Outcome;
    fn do_something_else(&self) -> Outcome;
    fn throw_exception(&self) -> Outcome;
    fn return_success(&self) -> Outcome;
    fn annotated_method(&self) -> Outcome;
    fn second_annotated_method(&self) -> Outcome;
    fn third_annotated_method(&self) -> Outcome;
}

/// 真实的业务对象
#[derive(Debug, Clone, Default)]
pub struct SimpleService {
    journal: Journal,
}

impl SimpleService {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    fn executed(&self, op: SimpleOperation, detail: Option<String>) {
        self.journal.record_target(op.method_name(), detail);
    }
}

impl SimpleApi for SimpleService {
    fn call_method_that_is_not_advised(&self) -> Outcome {
        self.executed(SimpleOperation::CallMethodThatIsNotAdvised, None);
        // 直接调用自身方法，不经过代理
        self.method_that_is_not_advised_if_called_from_within_the_service()
    }

    fn method_that_is_not_advised_if_called_from_within_the_service(&self) -> Outcome {
        self.executed(
            SimpleOperation::MethodThatIsNotAdvisedIfCalledFromWithinTheService,
            None,
        );
        Ok(NOT_ADVISED_MESSAGE.to_string())
    }

    fn do_something(&self, name: &str) -> Outcome {
        info!("Service doing something with the received name: {}", name);
        self.executed(SimpleOperation::DoSomething, Some(name.to_string()));
        Ok(DO_SOMETHING_MESSAGE.to_string())
    }

    fn do_something_else(&self) -> Outcome {
        info!("Service doing something else");
        self.executed(SimpleOperation::DoSomethingElse, None);
        Ok(DO_SOMETHING_MESSAGE.to_string())
    }

    fn throw_exception(&self) -> Outcome {
        info!("Service throwing an exception");
        self.executed(SimpleOperation::ThrowException, None);
        Err(ServiceError::runtime(EXCEPTION_MESSAGE))
    }

    fn return_success(&self) -> Outcome {
        info!("Service returning success");
        self.executed(SimpleOperation::ReturnSuccess, None);
        Ok(SUCCESS_MESSAGE.to_string())
    }

    fn annotated_method(&self) -> Outcome {
        self.executed(SimpleOperation::AnnotatedMethod, None);
        Ok(ANNOTATED_MESSAGE.to_string())
    }

    fn second_annotated_method(&self) -> Outcome {
        self.executed(SimpleOperation::SecondAnnotatedMethod, None);
        Ok(ANNOTATED_MESSAGE.to_string())
    }

    fn third_annotated_method(&self) -> Outcome {
        self.executed(SimpleOperation::ThirdAnnotatedMethod, None);
        Ok(ANNOTATED_MESSAGE.to_string())
    }
}

impl Advised for SimpleService {
    type Operation = SimpleOperation;

    fn operations() -> Vec<(SimpleOperation, OperationDescriptor)> {
        SimpleOperation::ALL
            .into_iter()
            .map(|op| (op, op.descriptor()))
            .collect()
    }
}

impl SimpleApi for Proxy<SimpleService> {
    fn call_method_that_is_not_advised(&self) -> Outcome {
        self.invoke(SimpleOperation::CallMethodThatIsNotAdvised, Vec::new(), |s| {
            s.call_method_that_is_not_advised()
        })
    }

    fn method_that_is_not_advised_if_called_from_within_the_service(&self) -> Outcome {
        self.invoke(
            SimpleOperation::MethodThatIsNotAdvisedIfCalledFromWithinTheService,
            Vec::new(),
            |s| s.method_that_is_not_advised_if_called_from_within_the_service(),
        )
    }

    fn do_something(&self, name: &str) -> Outcome {
        self.invoke(SimpleOperation::DoSomething, vec![name.to_string()], |s| {
            s.do_something(name)
        })
    }

    fn do_something_else(&self) -> Outcome {
        self.invoke(SimpleOperation::DoSomethingElse, Vec::new(), |s| {
            s.do_something_else()
        })
    }

    fn throw_exception(&self) -> Outcome {
        self.invoke(SimpleOperation::ThrowException, Vec::new(), |s| {
            s.throw_exception()
        })
    }

    fn return_success(&self) -> Outcome {
        self.invoke(SimpleOperation::ReturnSuccess, Vec::new(), |s| {
            s.return_success()
        })
    }

    fn annotated_method(&self) -> Outcome {
        self.invoke(SimpleOperation::AnnotatedMethod, Vec::new(), |s| {
            s.annotated_method()
        })
    }

    fn second_annotated_method(&self) -> Outcome {
        self.invoke(SimpleOperation::SecondAnnotatedMethod, Vec::new(), |s| {
            s.second_annotated_method()
        })
    }

    fn third_annotated_method(&self) -> Outcome {
        self.invoke(SimpleOperation::ThirdAnnotatedMethod, Vec::new(), |s| {
            s.third_annotated_method()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_table_covers_every_operation() {
        let table = SimpleService::operations();
        assert_eq!(table.len(), SimpleOperation::ALL.len());
        for (op, descriptor) in table {
            assert_eq!(descriptor.name(), op.method_name());
            assert_eq!(descriptor.scope(), SERVICE_SCOPE);
        }
    }

    #[test]
    fn test_service_scope_is_type_path() {
        assert_eq!(std::any::type_name::<SimpleService>(), SERVICE_SCOPE);
    }

    #[test]
    fn test_descriptor_shapes() {
        let d = SimpleOperation::DoSomething.descriptor();
        assert_eq!(d.params(), ["&str".to_string()]);

        let third = SimpleOperation::ThirdAnnotatedMethod.descriptor();
        assert!(third.has_marker(CUSTOM_ANNOTATION));
        assert!(third.has_marker(SECOND_CUSTOM_ANNOTATION));

        let second = SimpleOperation::SecondAnnotatedMethod.descriptor();
        assert!(!second.has_marker(CUSTOM_ANNOTATION));
    }

    #[test]
    fn test_plain_service_results() {
        let service = SimpleService::default();
        assert_eq!(
            service.call_method_that_is_not_advised().unwrap(),
            NOT_ADVISED_MESSAGE
        );
        assert_eq!(service.do_something("User").unwrap(), DO_SOMETHING_MESSAGE);
        assert_eq!(service.return_success().unwrap(), SUCCESS_MESSAGE);
        assert_eq!(
            service.throw_exception().unwrap_err().message(),
            EXCEPTION_MESSAGE
        );
        assert_eq!(service.third_annotated_method().unwrap(), ANNOTATED_MESSAGE);
    }

    #[test]
    fn test_internal_call_records_both_target_executions() {
        let service = SimpleService::default();
        service.call_method_that_is_not_advised().unwrap();

        let ops: Vec<_> = service
            .journal()
            .entries()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(
            ops,
            vec![
                "call_method_that_is_not_advised",
                "method_that_is_not_advised_if_called_from_within_the_service",
            ]
        );
    }
}
