/// 事件日志的接收端。
///
/// 每局结算后以及下注、亮牌等节点都会写入一行可读的描述。
/// 只管发送，不关心返回值，也不要求在哪个线程上处理。
pub trait EventSink: Send + Sync {
    fn record(&self, event: String);
}

impl<F> EventSink for F
where
    F: Fn(String) + Send + Sync,
{
    fn record(&self, event: String) {
        self(event)
    }
}
