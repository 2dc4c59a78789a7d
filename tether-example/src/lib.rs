/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Runnable examples for the Tether long-polling client.
//!
//! See the `examples/` directory:
//! - `status_client`: a build/test status reporter driven by named messages
//! - `coverage_watch`: one-shot supplementary data fetches with cache invalidation
