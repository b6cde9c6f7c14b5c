//! Basic usage: register a handful of tests and let the harness print its
//! report when it goes out of scope.
//!
//! Run with: cargo run --example basic

use attest::Harness;

fn main() -> anyhow::Result<()> {
    let t = Harness::new();

    t.test("sum of two numbers should be equal", || {
        t.expect(1 + 1).to_be(2);
    })?;

    t.test("1 + 1 should fail", || {
        t.expect(1 + 1).to_be(4);
    })?;

    t.test("should throw", || {
        t.expect_fn(|| panic!("expected error")).to_throw();
    })?;

    t.test("should fail when no error is thrown", || {
        t.expect_fn(|| {}).to_throw();
    })?;

    t.test("should be null", || {
        t.expect(None::<i32>).to_be_null();
    })?;

    t.test("should fail when not null", || {
        t.expect(Some(1)).to_be_null();
    })?;

    t.test("is instance of", || {
        t.expect(Vec::<i32>::new()).to_be_instance_of::<Vec<i32>>();
    })?;

    Ok(())
}
