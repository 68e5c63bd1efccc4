mod support;

mod test_collection;
mod test_queue;
