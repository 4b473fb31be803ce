use quotes_core::db::open_in_memory;
use quotes_core::{
    NewQuote, QuoteRepository, QuoteService, SqliteQuoteRepository, TagLoading,
};
use rusqlite::params;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

fn fresh_repo() -> SqliteQuoteRepository {
    SqliteQuoteRepository::try_new(open_in_memory().expect("in-memory db should open"))
        .expect("repository should sync schema")
}

fn now_ms() -> i64 {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch");
    i64::try_from(elapsed.as_millis()).expect("epoch millis should fit in i64")
}

#[test]
fn tag_loading_flag_controls_association_loading() {
    let repo = fresh_repo();
    repo.add_quote_with_tags(
        &NewQuote::new("Less is more", "Mies"),
        &["design".to_string(), "minimal".to_string()],
    )
    .expect("add should commit");

    let skipped = repo
        .all_quotes(TagLoading::Skip)
        .expect("listing should succeed");
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].tags.is_empty());

    let eager = repo
        .quotes_by_author("Mies", TagLoading::Eager)
        .expect("author query should succeed");
    let mut names: Vec<&str> = eager[0].tags.iter().map(|tag| tag.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["design", "minimal"]);
}

#[test]
fn by_tag_query_loads_every_tag_of_matching_quotes() {
    let repo = fresh_repo();
    repo.add_quote_with_tags(
        &NewQuote::new("quote", "Author"),
        &["one".to_string(), "two".to_string()],
    )
    .expect("add should commit");

    let by_tag = repo
        .quotes_by_tag("one", TagLoading::Eager)
        .expect("tag query should succeed");
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].tags.len(), 2);

    let by_tag_skipped = repo
        .quotes_by_tag("two", TagLoading::Skip)
        .expect("tag query should succeed");
    assert_eq!(by_tag_skipped.len(), 1);
    assert!(by_tag_skipped[0].tags.is_empty());
}

#[test]
fn returned_id_identifies_the_stored_row() {
    let repo = fresh_repo();
    let id = repo
        .add_quote_with_tags(&NewQuote::new("Eureka", "Archimedes"), &[])
        .expect("add should commit");

    let stored = repo
        .quotes_by_author("Archimedes", TagLoading::Skip)
        .expect("author query should succeed");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, id);
    assert_eq!(stored[0].deleted_at, None);
}

#[test]
fn timestamps_are_epoch_milliseconds() {
    let repo = fresh_repo();
    let before = now_ms();
    repo.add_quote_with_tags(&NewQuote::new("tick", "Clock"), &["time".to_string()])
        .expect("add should commit");
    let after = now_ms();

    let stored = repo
        .quotes_by_author("Clock", TagLoading::Eager)
        .expect("author query should succeed");
    let quote = &stored[0];
    // One millisecond of slack for clock rounding between SQLite and std.
    assert!(
        quote.created_at + 1 >= before && quote.created_at <= after + 1,
        "created_at {} outside [{before}, {after}]",
        quote.created_at
    );
    assert_eq!(quote.created_at, quote.updated_at);

    let tag = &quote.tags[0];
    assert!(tag.created_at + 1 >= before && tag.created_at <= after + 1);
}

#[test]
fn soft_deleted_rows_are_invisible_to_reads() {
    let repo = fresh_repo();
    repo.add_quote_with_tags(&NewQuote::new("gone", "Ghost"), &["spooky".to_string()])
        .expect("first add should commit");
    repo.add_quote_with_tags(
        &NewQuote::new("here", "Host"),
        &["spooky".to_string(), "hidden".to_string()],
    )
    .expect("second add should commit");

    {
        let conn = repo.handle().lock();
        conn.execute(
            "UPDATE quotes SET deleted_at = ?1 WHERE author = 'Ghost';",
            params![1_000_i64],
        )
        .expect("quote tombstone should apply");
        conn.execute(
            "UPDATE tags SET deleted_at = ?1 WHERE name = 'hidden';",
            params![1_000_i64],
        )
        .expect("tag tombstone should apply");
    }

    assert!(repo
        .quotes_by_author("Ghost", TagLoading::Eager)
        .expect("author query should succeed")
        .is_empty());
    assert!(repo
        .quotes_by_tag("hidden", TagLoading::Eager)
        .expect("tag query should succeed")
        .is_empty());

    let spooky = repo
        .quotes_by_tag("spooky", TagLoading::Eager)
        .expect("tag query should succeed");
    assert_eq!(spooky.len(), 1);
    assert_eq!(spooky[0].author, "Host");
    assert_eq!(spooky[0].tags.len(), 1);
    assert_eq!(spooky[0].tags[0].name, "spooky");

    assert_eq!(
        repo.tag_names().expect("tag listing should succeed"),
        vec!["spooky"]
    );
    assert_eq!(
        repo.all_quotes(TagLoading::Skip)
            .expect("listing should succeed")
            .len(),
        1
    );
}

#[test]
fn is_empty_ignores_soft_deleted_quotes() {
    let repo = fresh_repo();
    repo.add_quote_with_tags(&NewQuote::new("only", "One"), &[])
        .expect("add should commit");
    assert!(!repo.is_empty().expect("count should succeed"));

    repo.handle()
        .lock()
        .execute_batch("UPDATE quotes SET deleted_at = 1;")
        .expect("tombstone should apply");

    assert!(repo.is_empty().expect("count should succeed"));
}

#[test]
fn clones_share_one_store_handle() {
    let repo = fresh_repo();
    let other = repo.clone();
    repo.add_quote_with_tags(&NewQuote::new("shared", "Twin"), &[])
        .expect("add should commit");

    assert!(!other.is_empty().expect("count should succeed"));
}

#[test]
fn service_serves_concurrent_readers_alongside_a_writer() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    let service = QuoteService::new(fresh_repo());
    assert_send_sync(&service);
    service
        .add_quote_with_tags(
            NewQuote::new("To be or not to be", "Shakespeare"),
            vec!["drama".to_string(), "classic".to_string()],
        )
        .expect("seed add should commit");

    thread::scope(|scope| {
        let writer = scope.spawn(|| {
            for idx in 0..20 {
                service
                    .add_quote_with_tags(
                        NewQuote::new(format!("line {idx}"), "Writer"),
                        vec!["drama".to_string(), format!("act-{idx}")],
                    )
                    .expect("concurrent add should commit");
            }
        });

        let readers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    for _ in 0..20 {
                        let by_author = service
                            .get_by_author("Shakespeare")
                            .expect("author query should succeed");
                        assert_eq!(by_author.len(), 1);

                        let drama = service
                            .get_by_tag("drama")
                            .expect("tag query should succeed");
                        assert!(!drama.is_empty());

                        service.get_all().expect("listing should succeed");
                        service
                            .get_all_tag_names()
                            .expect("tag listing should succeed");
                        assert!(!service.is_empty().expect("count should succeed"));
                    }
                })
            })
            .collect();

        writer.join().expect("writer thread should not panic");
        for reader in readers {
            reader.join().expect("reader thread should not panic");
        }
    });

    assert_eq!(
        service
            .get_by_author("Writer")
            .expect("author query should succeed")
            .len(),
        20
    );
    assert_eq!(
        service
            .get_by_tag("drama")
            .expect("tag query should succeed")
            .len(),
        21
    );
}
